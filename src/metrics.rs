//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{IntCounterVec, IntGauge, Opts, Registry};
use std::sync::Once;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Account Metrics
    pub static ref SIGNUP_ATTEMPTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("frontdesk_signup_attempts_total", "Total number of signup attempts"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref LOGIN_ATTEMPTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("frontdesk_login_attempts_total", "Total number of login attempts"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref USERS_REGISTERED: IntGauge = IntGauge::new(
        "frontdesk_users_registered",
        "Total number of registered users"
    ).expect("metric can be created");

    // Session Metrics
    pub static ref TOKEN_VERIFICATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("frontdesk_token_verifications_total", "Total number of session token verifications"),
        &["outcome"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("frontdesk_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; registration happens on the first call.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(SIGNUP_ATTEMPTS_TOTAL.clone()))
            .expect("SIGNUP_ATTEMPTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(LOGIN_ATTEMPTS_TOTAL.clone()))
            .expect("LOGIN_ATTEMPTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(USERS_REGISTERED.clone()))
            .expect("USERS_REGISTERED can be registered");
        REGISTRY
            .register(Box::new(TOKEN_VERIFICATIONS_TOTAL.clone()))
            .expect("TOKEN_VERIFICATIONS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}
