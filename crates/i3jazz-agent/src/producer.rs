use i3jazz_collector::Collector;
use i3jazz_common::handoff::LineSender;
use i3jazz_common::protocol::{Block, StatusLine};
use tokio::sync::watch;
use tokio::time::{interval, timeout, Duration, MissedTickBehavior};

use crate::config::BlockStyle;

/// Lifecycle requested of the producer, driven by process signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// The bar is hidden; stop ticking until resumed.
    Paused,
    Shutdown,
}

/// One block of the bar: its collector and the styling applied to its text.
pub struct ConfiguredBlock {
    collector: Box<dyn Collector>,
    style: BlockStyle,
}

impl ConfiguredBlock {
    pub fn new(collector: Box<dyn Collector>, style: BlockStyle) -> Self {
        Self { collector, style }
    }

    pub fn collector_name(&self) -> &str {
        self.collector.name()
    }

    #[cfg(test)]
    pub fn style(&self) -> &BlockStyle {
        &self.style
    }
}

pub struct Producer {
    blocks: Vec<ConfiguredBlock>,
    interval: Duration,
    collector_timeout: Duration,
}

impl Producer {
    pub fn new(
        blocks: Vec<ConfiguredBlock>,
        interval: Duration,
        collector_timeout: Duration,
    ) -> Self {
        Self {
            blocks,
            interval,
            collector_timeout,
        }
    }

    /// Runs every collector once and assembles the status line in block order.
    ///
    /// A collector that fails or exceeds the timeout contributes its fallback
    /// text; the tick itself never fails.
    pub async fn tick(&mut self) -> StatusLine {
        let limit = self.collector_timeout;
        let mut line = StatusLine::with_capacity(self.blocks.len());

        for block in &mut self.blocks {
            let collector = block.collector.as_mut();
            let outcome = timeout(limit, collector.collect()).await;
            let text = match outcome {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    tracing::warn!(collector = collector.name(), error = %e, "Collection failed");
                    collector.fallback()
                }
                Err(_) => {
                    tracing::warn!(
                        collector = collector.name(),
                        timeout_ms = limit.as_millis() as u64,
                        "Collection timed out"
                    );
                    collector.fallback()
                }
            };
            line.push(block.style.apply(Block::new(text)));
        }

        line
    }

    /// Ticks until shutdown is requested or the encoder stops receiving.
    ///
    /// Each finished line is handed off before the next tick starts, so a
    /// slow encoder holds the producer back instead of lines piling up.
    /// Dropping `lines` on return ends the output stream.
    pub async fn run(mut self, lines: LineSender, mut control: watch::Receiver<RunState>) {
        let names: Vec<&str> = self
            .blocks
            .iter()
            .map(ConfiguredBlock::collector_name)
            .collect();
        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            blocks = ?names,
            "Starting collection loop"
        );

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if !wait_until_running(&mut control).await {
                break;
            }

            tokio::select! {
                biased;
                changed = control.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = tick.tick() => {}
            }

            let line = self.tick().await;
            tracing::trace!(blocks = line.len(), "Status line assembled");

            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut control) => break,
                sent = lines.send(line) => {
                    if sent.is_err() {
                        tracing::debug!("Encoder stopped receiving");
                        break;
                    }
                }
            }
        }

        tracing::info!("Collection loop stopped");
    }
}

/// Blocks while paused. Returns `false` once shutdown is requested or the
/// control channel is gone.
async fn wait_until_running(control: &mut watch::Receiver<RunState>) -> bool {
    loop {
        let state = *control.borrow_and_update();
        match state {
            RunState::Running => return true,
            RunState::Shutdown => return false,
            RunState::Paused => {}
        }
        if control.changed().await.is_err() {
            return false;
        }
    }
}

async fn wait_for_shutdown(control: &mut watch::Receiver<RunState>) {
    loop {
        if *control.borrow_and_update() == RunState::Shutdown {
            return;
        }
        if control.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use i3jazz_common::encoder::encode;
    use i3jazz_common::handoff::handoff;
    use i3jazz_common::protocol::Header;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const INTERVAL: Duration = Duration::from_secs(3);
    const COLLECT_TIMEOUT: Duration = Duration::from_millis(500);

    /// Reports how many times it has been called.
    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Collector for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn collect(&mut self) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(n.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl Collector for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn collect(&mut self) -> Result<String> {
            bail!("device missing")
        }

        fn fallback(&self) -> String {
            "n/a".to_string()
        }
    }

    struct Hung;

    #[async_trait]
    impl Collector for Hung {
        fn name(&self) -> &str {
            "hung"
        }

        async fn collect(&mut self) -> Result<String> {
            std::future::pending::<()>().await;
            Ok("never".to_string())
        }

        fn fallback(&self) -> String {
            "slow".to_string()
        }
    }

    /// Yields the scripted texts, then requests shutdown.
    struct Scripted {
        texts: Vec<&'static str>,
        next: usize,
        control: watch::Sender<RunState>,
    }

    #[async_trait]
    impl Collector for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn collect(&mut self) -> Result<String> {
            let text = self.texts.get(self.next).copied();
            self.next += 1;
            match text {
                Some(text) => Ok(text.to_string()),
                None => {
                    let _ = self.control.send(RunState::Shutdown);
                    Ok("late".to_string())
                }
            }
        }
    }

    fn plain(collector: impl Collector + 'static) -> ConfiguredBlock {
        ConfiguredBlock::new(Box::new(collector), BlockStyle::default())
    }

    fn texts(line: &StatusLine) -> Vec<&str> {
        line.blocks().iter().map(|b| b.full_text.as_str()).collect()
    }

    fn counting() -> (Counting, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Counting {
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn failing_collector_falls_back_every_tick() {
        let (count, _) = counting();
        let producer = Producer::new(
            vec![plain(Failing), plain(count)],
            INTERVAL,
            COLLECT_TIMEOUT,
        );
        let (tx, mut rx) = handoff();
        let (_control_tx, control_rx) = watch::channel(RunState::Running);
        let handle = tokio::spawn(producer.run(tx, control_rx));

        for expected in 1..=5 {
            let line = rx.recv().await.unwrap();
            assert_eq!(texts(&line), vec!["n/a".to_string(), expected.to_string()]);
        }
        assert!(!handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_collector_times_out_to_fallback() {
        let mut producer = Producer::new(
            vec![plain(Hung), plain(Failing)],
            INTERVAL,
            COLLECT_TIMEOUT,
        );
        let line = producer.tick().await;
        assert_eq!(texts(&line), vec!["slow", "n/a"]);
    }

    #[tokio::test]
    async fn blocks_keep_configured_order_and_style() {
        let (count, _) = counting();
        let style = BlockStyle {
            color: Some("#888888".to_string()),
            separator: Some(true),
            ..BlockStyle::default()
        };
        let mut producer = Producer::new(
            vec![
                ConfiguredBlock::new(Box::new(Failing), style.clone()),
                ConfiguredBlock::new(Box::new(count), BlockStyle::default()),
            ],
            INTERVAL,
            COLLECT_TIMEOUT,
        );

        let line = producer.tick().await;
        assert_eq!(
            line.blocks(),
            &[
                Block::new("n/a").color("#888888").separator(true),
                Block::new("1"),
            ]
        );
        let second = producer.tick().await;
        assert_eq!(texts(&second), vec!["n/a", "2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_encoder_holds_back_producer() {
        let (count, calls) = counting();
        let producer = Producer::new(vec![plain(count)], INTERVAL, COLLECT_TIMEOUT);
        let (tx, mut rx) = handoff();
        let (_control_tx, control_rx) = watch::channel(RunState::Running);
        tokio::spawn(producer.run(tx, control_rx));

        // One line sits in the slot, the next is computed and waiting to send.
        tokio::time::sleep(INTERVAL * 10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let first = rx.recv().await.unwrap();
        assert_eq!(texts(&first), vec!["1"]);

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Nothing was skipped while the encoder was stalled.
        assert_eq!(texts(&rx.recv().await.unwrap()), vec!["2"]);
        assert_eq!(texts(&rx.recv().await.unwrap()), vec!["3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_closes_handoff() {
        let (count, _) = counting();
        let producer = Producer::new(vec![plain(count)], INTERVAL, COLLECT_TIMEOUT);
        let (tx, mut rx) = handoff();
        let (control_tx, control_rx) = watch::channel(RunState::Running);
        let handle = tokio::spawn(producer.run(tx, control_rx));

        assert!(rx.recv().await.is_some());
        control_tx.send(RunState::Shutdown).unwrap();
        handle.await.unwrap();

        while rx.recv().await.is_some() {}
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn producer_stops_when_encoder_is_gone() {
        let (count, _) = counting();
        let producer = Producer::new(vec![plain(count)], INTERVAL, COLLECT_TIMEOUT);
        let (tx, rx) = handoff();
        let (_control_tx, control_rx) = watch::channel(RunState::Running);
        drop(rx);

        producer.run(tx, control_rx).await;
    }

    #[tokio::test(start_paused = true)]
    async fn paused_producer_does_not_tick() {
        let (count, calls) = counting();
        let producer = Producer::new(vec![plain(count)], INTERVAL, COLLECT_TIMEOUT);
        let (tx, mut rx) = handoff();
        let (control_tx, control_rx) = watch::channel(RunState::Paused);
        tokio::spawn(producer.run(tx, control_rx));

        tokio::time::sleep(INTERVAL * 5).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        control_tx.send(RunState::Running).unwrap();
        assert_eq!(texts(&rx.recv().await.unwrap()), vec!["1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn three_ticks_stream_end_to_end() {
        let (control_tx, control_rx) = watch::channel(RunState::Running);
        let scripted = Scripted {
            texts: vec!["A", "B", "C"],
            next: 0,
            control: control_tx,
        };
        let style = BlockStyle {
            separator: Some(true),
            ..BlockStyle::default()
        };
        let producer = Producer::new(
            vec![ConfiguredBlock::new(Box::new(scripted), style)],
            INTERVAL,
            COLLECT_TIMEOUT,
        );
        let (tx, rx) = handoff();
        tokio::spawn(producer.run(tx, control_rx));

        let mut out = Vec::new();
        encode(&mut out, &Header::new(1), rx).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"version":1}[[{"full_text":"A","separator":true}],[{"full_text":"B","separator":true}],[{"full_text":"C","separator":true}]]"#
        );
    }
}
