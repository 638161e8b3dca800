//! Per key update pipelines, every key gets its own queue and a consumer task
//! which owns it. The consumer makes sure that:
//! - there is only ever one write in flight for a key
//! - a burst of writes which queued up while we were busy collapses to the
//! latest one (last write wins)
//! - if nothing shows up for a while we ask the consumer for an idle update
//! so the entity can go wander around on its own
//!
//! Sending `None` down a queue terminates the pipeline once whatever is
//! pending has been applied.

use std::{collections::HashMap, fmt::Debug, hash::Hash, sync::Arc, time::Duration};

use async_trait::async_trait;
use rand::{thread_rng, Rng};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

#[async_trait]
pub trait UpdateConsumer<K, U>: Send + Sync + 'static {
    type Error: Debug + Send;

    async fn apply(&self, key: &K, update: U) -> Result<(), Self::Error>;

    /// The update to synthesize when the pipeline got bored, `None` when the
    /// entity behind the key should stay put
    fn idle_update(&self, key: &K) -> Option<U>;
}

#[derive(Debug, Clone)]
pub struct QueueSettings {
    /// the boredom window, we draw from [min, max)
    pub boredom_min: Duration,
    pub boredom_max: Duration,
    /// pause after every write, keeps us under the rate limit
    pub cooldown: Duration,
}

impl QueueSettings {
    pub fn boredom_time(&self) -> Duration {
        let min = self.boredom_min.as_millis() as u64;
        let max = self.boredom_max.as_millis() as u64;
        if max <= min {
            return self.boredom_min;
        }
        Duration::from_millis(thread_rng().gen_range(min..max))
    }
}

#[derive(Debug, PartialEq)]
enum Batch<U> {
    /// the latest update out of everything which was buffered
    Next(U),
    /// the queue was terminated, this is whatever real update was left over
    Last(Option<U>),
}

/// Waits for the next item and then takes everything else which is already
/// buffered, stopping at the terminal marker.
/// Only the first receive suspends so dropping this future never loses an item.
async fn next_batch<U>(receiver: &flume::Receiver<Option<U>>) -> Batch<U> {
    let first = match receiver.recv_async().await {
        Ok(update) => update,
        // every sender is gone, nothing more can come in
        Err(_) => return Batch::Last(None),
    };
    if first.is_none() {
        return Batch::Last(None);
    }
    let mut updates = vec![first];
    while let Ok(update) = receiver.try_recv() {
        let is_terminal = update.is_none();
        updates.push(update);
        if is_terminal {
            break;
        }
    }

    let skipped = updates.len().saturating_sub(1);
    if skipped > 0 {
        debug!(skipped, "collapsing buffered updates");
    }

    match updates.pop() {
        Some(Some(update)) => Batch::Next(update),
        // the tail is the terminal marker, the marker is the first None we saw
        // so everything before it is a real update
        _ => Batch::Last(updates.pop().flatten()),
    }
}

async fn apply_update<K, U, C>(key: &K, update: U, consumer: &C, cooldown: Duration)
where
    K: Debug,
    C: UpdateConsumer<K, U>,
{
    if let Err(err) = consumer.apply(key, update).await {
        error!(?key, ?err, "update failed");
    }
    tokio::time::sleep(cooldown).await;
}

async fn run_queue<K, U, C>(
    key: K,
    receiver: flume::Receiver<Option<U>>,
    consumer: Arc<C>,
    settings: QueueSettings,
) where
    K: Debug,
    C: UpdateConsumer<K, U>,
{
    debug!(?key, "update queue started");
    loop {
        let next = next_batch(&receiver);
        tokio::pin!(next);

        // we keep polling the same pending receive while we are bored, so a
        // real update which shows up during an idle write is picked up on the
        // next go around instead of being dropped
        let batch = loop {
            let boredom = settings.boredom_time();
            tokio::select! {
                biased;
                batch = &mut next => break batch,
                _ = tokio::time::sleep(boredom) => {
                    if let Some(update) = consumer.idle_update(&key) {
                        debug!(?key, ?boredom, "bored, applying idle update");
                        apply_update(&key, update, consumer.as_ref(), settings.cooldown).await;
                    }
                }
            }
        };

        match batch {
            Batch::Next(update) => {
                apply_update(&key, update, consumer.as_ref(), settings.cooldown).await;
            }
            Batch::Last(update) => {
                if let Some(update) = update {
                    apply_update(&key, update, consumer.as_ref(), settings.cooldown).await;
                }
                debug!(?key, "update queue closed");
                return;
            }
        }
    }
}

pub struct UpdateQueues<K, U, C> {
    queues: HashMap<K, flume::Sender<Option<U>>>,
    tasks: JoinSet<()>,
    consumer: Arc<C>,
    settings: QueueSettings,
}

impl<K, U, C> UpdateQueues<K, U, C>
where
    K: Debug + Clone + Eq + Hash + Send + Sync + 'static,
    U: Send + 'static,
    C: UpdateConsumer<K, U>,
{
    pub fn new(consumer: Arc<C>, settings: QueueSettings) -> Self {
        Self {
            queues: HashMap::new(),
            tasks: JoinSet::new(),
            consumer,
            settings,
        }
    }

    /// Queues up an update for the key, starting a pipeline for it if this is
    /// the first time we see it. `None` terminates the pipeline after it drains,
    /// a later update for the same key starts a fresh one.
    pub fn add_task(&mut self, key: K, task: Option<U>) {
        self.reap_finished();

        let is_terminal = task.is_none();
        if is_terminal && !self.queues.contains_key(&key) {
            return;
        }

        let sender = self.queues.entry(key.clone()).or_insert_with(|| {
            let (sender, receiver) = flume::unbounded();
            self.tasks.spawn(run_queue(
                key.clone(),
                receiver,
                self.consumer.clone(),
                self.settings.clone(),
            ));
            sender
        });

        if sender.send(task).is_err() {
            warn!(?key, "update queue is gone, dropping update");
        }

        if is_terminal {
            self.queues.remove(&key);
        }
    }

    /// Pipelines which are still around, finished ones are only reaped on
    /// the next `add_task`
    pub fn pipelines(&self) -> usize {
        self.tasks.len()
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result {
                error!(?err, "update queue panicked");
            }
        }
    }

    /// Terminates every pipeline and waits for all of them to drain
    pub async fn close(&mut self) {
        for (key, sender) in self.queues.drain() {
            if sender.send(None).is_err() {
                warn!(?key, "update queue already stopped");
            }
        }

        while let Some(result) = self.tasks.join_next().await {
            if let Err(err) = result {
                error!(?err, "update queue panicked");
            }
        }
    }
}
