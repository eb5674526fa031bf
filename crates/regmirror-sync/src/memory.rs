use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use regmirror_types::EntryNumber;
use tracing::trace;

use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteTransport;
use crate::types::RegisterProof;

#[derive(Default)]
struct Script {
    segments: VecDeque<Result<String, String>>,
    proofs: VecDeque<RegisterProof>,
    requests: Vec<EntryNumber>,
}

/// Transport that serves scripted responses, for tests and offline tools.
///
/// Each refresh consumes one segment and one proof, in the order they were
/// pushed. Running out of script is a transport error.
#[derive(Default)]
pub struct InMemoryTransport {
    script: Mutex<Script>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push_response`](Self::push_response).
    pub fn with_response(self, segment: impl Into<String>, proof: RegisterProof) -> Self {
        self.push_response(segment, proof);
        self
    }

    /// Queue a segment and the proof served alongside it.
    pub fn push_response(&self, segment: impl Into<String>, proof: RegisterProof) {
        let mut script = self.script.lock().expect("lock poisoned");
        script.segments.push_back(Ok(segment.into()));
        script.proofs.push_back(proof);
    }

    /// Queue a segment fetch that fails with a transport error.
    pub fn push_failure(&self, message: impl Into<String>) {
        let mut script = self.script.lock().expect("lock poisoned");
        script.segments.push_back(Err(message.into()));
    }

    /// The `after` argument of every segment fetch so far.
    pub fn segment_requests(&self) -> Vec<EntryNumber> {
        self.script.lock().expect("lock poisoned").requests.clone()
    }

    /// Number of scripted segments not yet served.
    pub fn pending(&self) -> usize {
        self.script.lock().expect("lock poisoned").segments.len()
    }
}

#[async_trait]
impl RemoteTransport for InMemoryTransport {
    async fn fetch_segment(&self, after: EntryNumber) -> SyncResult<String> {
        let mut script = self.script.lock().expect("lock poisoned");
        script.requests.push(after);
        trace!(after, "serving scripted segment");
        match script.segments.pop_front() {
            Some(Ok(segment)) => Ok(segment),
            Some(Err(message)) => Err(SyncError::Transport(message)),
            None => Err(SyncError::Transport("no scripted segment left".into())),
        }
    }

    async fn fetch_proof(&self) -> SyncResult<RegisterProof> {
        let mut script = self.script.lock().expect("lock poisoned");
        script
            .proofs
            .pop_front()
            .ok_or_else(|| SyncError::Transport("no scripted proof left".into()))
    }
}
