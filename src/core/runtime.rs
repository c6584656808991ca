//! Interval loop driving the signal engine

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::history::SignalLedger;
use crate::models::signal::AcceptedSignal;
use crate::signals::engine::{CycleOutcome, EngineError, SignalEngine};

/// Configuration for the evaluation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub evaluation_interval_seconds: u64,
    /// Bar width requested from the market-data provider
    pub interval: String,
    /// Bars requested per pair
    pub lookback: usize,
    pub pairs: Vec<String>,
    /// Port of the worker's own `/metrics` listener; 0 disables it
    pub metrics_port: u16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_seconds: 60,
            interval: "1m".to_string(),
            lookback: 100,
            pairs: [
                "EURUSD=X", "GBPUSD=X", "USDJPY=X", "AUDUSD=X", "USDCAD=X", "AUDCAD=X",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            metrics_port: 9091,
        }
    }
}

/// Runs one cycle per tick. Ticks that arrive while a cycle is still running
/// are skipped, so at most one cycle is in flight.
pub struct SignalRuntime {
    config: RuntimeConfig,
    engine: SignalEngine,
    ledger: Arc<Mutex<SignalLedger>>,
    accepted_tx: Option<mpsc::UnboundedSender<AcceptedSignal>>,
    rng: StdRng,
}

impl SignalRuntime {
    pub fn new(config: RuntimeConfig, engine: SignalEngine, ledger: Arc<Mutex<SignalLedger>>) -> Self {
        Self {
            config,
            engine,
            ledger,
            accepted_tx: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Receive every accepted signal as it is persisted
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<AcceptedSignal> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.accepted_tx = Some(tx);
        rx
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// One cycle. The ledger lock is only held while submitting.
    pub async fn tick(&mut self) -> Result<CycleOutcome, EngineError> {
        if !self.engine.begin_cycle(Utc::now()) {
            return Ok(CycleOutcome::MarketClosed);
        }

        let evaluation = self.engine.evaluate(&self.config.pairs, &mut self.rng).await;
        let outcome = {
            let mut ledger = self.ledger.lock().await;
            self.engine.submit(&mut ledger, evaluation, Utc::now())?
        };

        match &outcome {
            CycleOutcome::Accepted(evaluation, signal) => {
                info!(
                    pair = %signal.signal.pair,
                    direction = %signal.signal.direction,
                    confidence = signal.signal.confidence,
                    skipped = evaluation.skipped.len(),
                    "SignalRuntime: signal accepted"
                );
                if let Some(tx) = &self.accepted_tx {
                    // Receiver gone means nobody is listening any more
                    let _ = tx.send(signal.clone());
                }
            }
            CycleOutcome::RateLimited(_, candidate) => {
                info!(pair = %candidate.pair, "SignalRuntime: candidate rate-limited");
            }
            CycleOutcome::NoSignal(evaluation) => {
                info!(
                    pairs = self.config.pairs.len(),
                    skipped = evaluation.skipped.len(),
                    "SignalRuntime: no signal this cycle"
                );
            }
            CycleOutcome::MarketClosed => {}
        }

        Ok(outcome)
    }

    /// Loop until `shutdown` resolves
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let period = Duration::from_secs(self.config.evaluation_interval_seconds.max(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            interval_seconds = period.as_secs(),
            pairs = ?self.config.pairs,
            "SignalRuntime: starting evaluation loop"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("SignalRuntime: shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = %e, "SignalRuntime: cycle failed");
                    }
                }
            }
        }
    }
}
