//! Application state.

use std::sync::Arc;
use std::time::Duration;

use tutorpay_ledger::{HttpSettlementGateway, PaymentProcessor, TransactionLog, WalletLedger};
use tutorpay_store::{RocksStore, Store};

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// The wallet ledger.
    pub ledger: WalletLedger,

    /// The transaction log.
    pub log: TransactionLog,

    /// The payment processor (present when a gateway is configured).
    pub payments: Option<PaymentProcessor>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let store_dyn: Arc<dyn Store> = store.clone();
        let ledger = WalletLedger::new(Arc::clone(&store_dyn));
        let log = TransactionLog::new(Arc::clone(&store_dyn));

        // Create the payment processor if a gateway is configured
        let payments = config
            .gateway_url
            .as_ref()
            .zip(config.gateway_api_key.as_ref())
            .map(|(url, key)| {
                tracing::info!(gateway_url = %url, "Settlement gateway enabled");
                let gateway = Arc::new(HttpSettlementGateway::new(url, key));
                PaymentProcessor::new(
                    Arc::clone(&store_dyn),
                    gateway,
                    Duration::from_secs(config.settlement_timeout_seconds),
                )
            });

        if payments.is_none() {
            tracing::warn!("Settlement gateway not configured - payments will not be available");
        }

        Self {
            store,
            ledger,
            log,
            payments,
            config,
        }
    }

    /// Check if the settlement gateway is configured.
    #[must_use]
    pub fn has_gateway(&self) -> bool {
        self.payments.is_some()
    }
}
