//! Handle to a search running on a background thread.

use std::panic;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::sync::CancelToken;

use super::{SearchError, SearchProgress, SearchResult};

/// Message from a background search to its caller.
#[derive(Clone, Debug)]
pub enum SearchEvent {
    /// A new depth was completed; depths strictly increase.
    Progress(SearchProgress),
    /// The search is over. Always the last event.
    Finished(Result<SearchResult, SearchError>),
}

/// Returned by [`Searcher::spawn`](super::Searcher::spawn).
///
/// Events arrive on [`SearchHandle::events`] as the search runs. Dropping the
/// handle does not stop the search; call [`SearchHandle::cancel`] first.
pub struct SearchHandle {
    events: Receiver<SearchEvent>,
    cancel: CancelToken,
    thread: JoinHandle<Result<SearchResult, SearchError>>,
}

impl SearchHandle {
    pub(crate) fn start<F>(cancel: CancelToken, body: F) -> Self
    where
        F: FnOnce(CancelToken, &Sender<SearchEvent>) -> Result<SearchResult, SearchError>
            + Send
            + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let token = cancel.clone();
        let thread = thread::spawn(move || {
            let result = body(token, &tx);
            let _ = tx.send(SearchEvent::Finished(result.clone()));
            result
        });
        SearchHandle {
            events: rx,
            cancel,
            thread,
        }
    }

    /// Progress and completion events, in order.
    #[must_use]
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    /// Ask the search to stop; it still finishes with the best completed
    /// depth.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token observed by this search.
    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the search ends and return its result. A panic on the
    /// search thread is resumed here.
    pub fn wait(self) -> Result<SearchResult, SearchError> {
        match self.thread.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
