//! Scripted chain reader

use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use duel::{Address, ChainReader, GameStateSnapshot, ReaderError};

/// Returns queued results in order; repeats the last one once the queue drains
#[derive(Debug)]
pub struct MockChainReader {
    script: Mutex<VecDeque<Result<GameStateSnapshot, ReaderError>>>,
    last: Mutex<Option<Result<GameStateSnapshot, ReaderError>>>,
    reads: Mutex<Vec<Address>>,
}

impl MockChainReader {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Reader that always returns `snapshot`
    pub fn fixed(snapshot: GameStateSnapshot) -> Self {
        let reader = Self::new();
        reader.push(Ok(snapshot));
        reader
    }

    pub fn push(&self, result: Result<GameStateSnapshot, ReaderError>) {
        self.script.lock().unwrap().push_back(result);
    }

    /// Contracts requested so far
    pub fn reads(&self) -> Vec<Address> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn read(&self, contract: &Address) -> Result<GameStateSnapshot, ReaderError> {
        self.reads.lock().unwrap().push(*contract);

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(result) = next {
            *last = Some(result);
        }

        last.clone().unwrap_or_else(|| Err(ReaderError::ReadFailure {
            message: "mock reader has no scripted snapshot".to_string(),
        }))
    }
}
