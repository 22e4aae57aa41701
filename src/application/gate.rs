use std::sync::Mutex;

/// Guards the fatal "unable to load file" alert so it is raised at most once
/// for every downloader sharing the gate.
#[derive(Debug, Default)]
pub struct ErrorReportGate {
    reported: Mutex<bool>,
}

impl ErrorReportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for exactly one caller: the one that must raise the alert.
    pub fn try_claim(&self) -> bool {
        let mut reported = self.reported.lock().unwrap_or_else(|e| e.into_inner());
        if *reported {
            return false;
        }
        *reported = true;
        true
    }

    pub fn is_reported(&self) -> bool {
        *self.reported.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn claims_once() {
        let gate = ErrorReportGate::new();
        assert!(!gate.is_reported());
        assert!(gate.try_claim());
        assert!(!gate.try_claim());
        assert!(gate.is_reported());
    }

    #[test]
    fn one_winner_across_threads() {
        let gate = Arc::new(ErrorReportGate::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.try_claim())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
