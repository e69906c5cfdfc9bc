//! Event loop between the host runtime and the widget context.
//!
//! The host side holds a [`HostHandle`] and pushes [`HostEvent`]s into a
//! bounded channel. A single [`WidgetRuntime`] task drains the channel, so
//! deliveries are applied one at a time and in arrival order.

use crate::context::{HostEvent, WidgetConfig, WidgetContext};
use anyhow::{anyhow, Result};
use chrono::Utc;
use tokio::sync::mpsc;
use wfd_core::observation::DeliveryBatch;

const CHANNEL_CAPACITY: usize = 32;

type Observer = Box<dyn FnMut(&WidgetContext) + Send>;

/// Sending half, given to whatever plays the host runtime.
#[derive(Debug, Clone)]
pub struct HostHandle {
    sender: mpsc::Sender<HostEvent>,
}

impl HostHandle {
    pub async fn send(&self, event: HostEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| anyhow!("widget runtime has stopped"))
    }

    pub async fn start(&self, config: WidgetConfig) -> Result<()> {
        self.send(HostEvent::Start(config)).await
    }

    pub async fn realtime(&self, deliveries: Vec<DeliveryBatch>) -> Result<()> {
        self.send(HostEvent::Realtime(deliveries)).await
    }

    pub async fn error(&self, message: &str) -> Result<()> {
        self.send(HostEvent::Error(message.to_string())).await
    }
}

/// Receiving half. Owns the context and applies events to it.
pub struct WidgetRuntime {
    receiver: mpsc::Receiver<HostEvent>,
    context: WidgetContext,
    observers: Vec<Observer>,
}

/// Create a connected host handle and runtime.
pub fn channel() -> (HostHandle, WidgetRuntime) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    (
        HostHandle { sender },
        WidgetRuntime {
            receiver,
            context: WidgetContext::new(),
            observers: Vec::new(),
        },
    )
}

impl WidgetRuntime {
    /// Register a callback that sees the context after every change.
    pub fn on_update<F>(&mut self, observer: F)
    where
        F: FnMut(&WidgetContext) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn context(&self) -> &WidgetContext {
        &self.context
    }

    /// Apply one event and notify observers if it changed anything.
    pub fn handle(&mut self, event: HostEvent) {
        let changed = self.context.apply(event, &Utc::now());
        if changed {
            for observer in self.observers.iter_mut() {
                observer(&self.context);
            }
        }
    }

    /// Process events until every [`HostHandle`] is dropped, then return
    /// the final context.
    pub async fn run(mut self) -> WidgetContext {
        log::info!("[WFD] widget: runtime started");
        while let Some(event) = self.receiver.recv().await {
            self.handle(event);
        }
        log::info!(
            "[WFD] widget: runtime stopped after {} realtime events",
            self.context.realtime_event_count
        );
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use wfd_core::observation::RawObservation;

    fn delivery(temperature: f64) -> Vec<DeliveryBatch> {
        vec![DeliveryBatch::new(vec![RawObservation::new(
            "temperature_2m",
            temperature,
        )
        .with_time("2024-01-01T06:00:00Z")
        .with_group("2024-01-01_06")])]
    }

    #[tokio::test]
    async fn test_events_apply_in_order() {
        let (host, runtime) = channel();
        let task = tokio::spawn(runtime.run());

        host.start(WidgetConfig::default()).await.unwrap();
        host.realtime(delivery(61.0)).await.unwrap();
        host.realtime(delivery(62.0)).await.unwrap();
        host.realtime(Vec::new()).await.unwrap();
        drop(host);

        let context = task.await.unwrap();
        assert_eq!(context.realtime_event_count, 3);
        assert_eq!(context.weather_data.len(), 1);
        assert_eq!(context.weather_data[0].temperature_two_m, 62.0);
        assert!(!context.is_loading);
        assert!(context.widget.is_some());
    }

    #[tokio::test]
    async fn test_observers_see_changes() {
        let (host, mut runtime) = channel();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        runtime.on_update(move |context| {
            sink.lock()
                .unwrap()
                .push((context.realtime_event_count, context.is_loading));
        });
        let task = tokio::spawn(runtime.run());

        host.error("transport lost").await.unwrap();
        host.error("transport lost").await.unwrap();
        host.realtime(delivery(70.0)).await.unwrap();
        drop(host);
        task.await.unwrap();

        // the second error changed nothing
        assert_eq!(*seen.lock().unwrap(), vec![(0, false), (1, false)]);
    }

    #[tokio::test]
    async fn test_send_after_stop_fails() {
        let (host, runtime) = channel();
        drop(runtime);
        assert!(host.error("late").await.is_err());
    }
}
