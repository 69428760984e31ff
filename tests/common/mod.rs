//! 测试替身：可记录调用的缓存、脚本化的搜索和条目处理器

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use matchup_advice::error::{CacheError, ItemError, ProviderError};
use matchup_advice::{
    CacheStore, Dependencies, EvidenceItem, EvidenceProvider, ItemProcessor, Orchestrator,
    OrchestratorSettings, Query, NOT_APPLICABLE_MARKER,
};

pub const PLACEHOLDER: &str = "low confidence placeholder";

/// 记录读写次数的缓存
#[derive(Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, String>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub fail_get: bool,
    pub fail_set: bool,
}

impl RecordingCache {
    pub fn failing_get() -> Self {
        Self {
            fail_get: true,
            ..Self::default()
        }
    }

    pub fn failing_set() -> Self {
        Self {
            fail_set: true,
            ..Self::default()
        }
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let cache = Self::default();
        cache
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        cache
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_get {
            return Err(CacheError::Unavailable {
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_set {
            return Err(CacheError::WriteFailed {
                key: key.to_string(),
                reason: "read-only replica".to_string(),
            });
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 固定返回一组条目的搜索
pub struct ScriptedProvider {
    items: Option<Vec<EvidenceItem>>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn with_links(links: &[String]) -> Self {
        Self {
            items: Some(links.iter().map(|l| EvidenceItem::new(l.clone())).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::with_links(&[])
    }

    pub fn failing() -> Self {
        Self {
            items: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvidenceProvider for ScriptedProvider {
    async fn find(&self, _query: &Query) -> Result<Vec<EvidenceItem>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items.clone().ok_or_else(|| ProviderError::BadResponse {
            endpoint: "search".to_string(),
            status: 500,
        })
    }
}

/// 单个条目的脚本行为
#[derive(Debug, Clone)]
pub enum Behavior {
    Artifact(String),
    NotApplicable,
    Fail,
    Panic,
}

/// 按链接脚本化的条目处理器
pub struct ScriptedProcessor {
    behaviors: HashMap<String, (Behavior, Duration)>,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedProcessor {
    pub fn new(script: Vec<(String, Behavior, Duration)>) -> Self {
        Self {
            behaviors: script
                .into_iter()
                .map(|(link, behavior, delay)| (link, (behavior, delay)))
                .collect(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemProcessor for ScriptedProcessor {
    async fn process(&self, item: &EvidenceItem, _query: &Query) -> Result<String, ItemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (behavior, delay) = self
            .behaviors
            .get(&item.link)
            .cloned()
            .unwrap_or((Behavior::Fail, Duration::ZERO));

        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match behavior {
            Behavior::Artifact(text) => Ok(text),
            Behavior::NotApplicable => Ok(NOT_APPLICABLE_MARKER.to_string()),
            Behavior::Fail => Err(ItemError::Scrape {
                link: item.link.clone(),
                reason: "status 503".to_string(),
            }),
            Behavior::Panic => panic!("scripted panic for {}", item.link),
        }
    }
}

pub fn link(i: usize) -> String {
    format!("https://www.reddit.com/r/summonerschool/comments/{}/", i)
}

pub fn settings(deadline: Duration) -> OrchestratorSettings {
    OrchestratorSettings {
        deadline,
        cache_ttl: Duration::from_secs(2_592_000),
        placeholder: PLACEHOLDER.to_string(),
        max_concurrent_items: None,
    }
}

pub fn orchestrator(
    cache: Arc<RecordingCache>,
    provider: Arc<ScriptedProvider>,
    processor: Arc<ScriptedProcessor>,
    settings: OrchestratorSettings,
) -> Orchestrator {
    Orchestrator::new(
        Dependencies {
            cache,
            provider,
            processor,
        },
        settings,
    )
}

pub fn query() -> Query {
    Query::new("Darius", "Garen", "top")
}
