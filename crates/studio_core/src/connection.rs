use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// First connection since the session was created (or reset).
    First,
    Reconnect,
}

/// Connection lifecycle shared by the listeners that react to connects.
#[derive(Debug)]
pub struct ConnectionSession {
    first_connection: AtomicBool,
}

impl Default for ConnectionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionSession {
    pub fn new() -> Self {
        Self {
            first_connection: AtomicBool::new(true),
        }
    }

    /// Records a connection and classifies it. Only one caller ever sees
    /// [`ConnectionKind::First`] between resets.
    pub fn observe_connection(&self) -> ConnectionKind {
        if self.first_connection.swap(false, Ordering::AcqRel) {
            ConnectionKind::First
        } else {
            ConnectionKind::Reconnect
        }
    }

    pub fn is_first_connection(&self) -> bool {
        self.first_connection.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.first_connection.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_connection_is_reported_once() {
        let session = ConnectionSession::new();
        assert!(session.is_first_connection());
        assert_eq!(session.observe_connection(), ConnectionKind::First);
        assert!(!session.is_first_connection());
        assert_eq!(session.observe_connection(), ConnectionKind::Reconnect);
        assert_eq!(session.observe_connection(), ConnectionKind::Reconnect);
    }

    #[test]
    fn reset_starts_a_new_epoch() {
        let session = ConnectionSession::new();
        session.observe_connection();
        session.reset();
        assert_eq!(session.observe_connection(), ConnectionKind::First);
    }

    #[test]
    fn concurrent_observers_see_a_single_first() {
        let session = std::sync::Arc::new(ConnectionSession::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = session.clone();
                std::thread::spawn(move || session.observe_connection())
            })
            .collect();
        let firsts = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|kind| *kind == ConnectionKind::First)
            .count();
        assert_eq!(firsts, 1);
    }
}
