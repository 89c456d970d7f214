//! QueueListing - what the list command prints for a queue.

use std::fmt;

/// The first few jobs of a queue plus its total size.
///
/// ```ignore
/// let listing = manager.list("emails", 2).await?;
/// println!("{listing}");
/// // welcome alice
/// // welcome bob
/// // (3 omitted) ...
/// // (5 total)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueListing {
    queue: String,
    labels: Vec<String>,
    total: usize,
}

impl QueueListing {
    pub fn new(queue: impl Into<String>, labels: Vec<String>, total: usize) -> Self {
        Self {
            queue: queue.into(),
            labels,
            total,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Visible jobs not shown. The count may have moved since the peek, so
    /// this never goes below zero.
    pub fn omitted(&self) -> usize {
        self.total.saturating_sub(self.labels.len())
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.labels.clone();
        let omitted = self.omitted();
        if omitted > 0 {
            lines.push(format!("({omitted} omitted) ..."));
        }
        lines.push(format!("({} total)", self.total));
        lines
    }
}

impl fmt::Display for QueueListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingJob, spy_manager};

    #[tokio::test]
    async fn listing_shows_head_and_omitted_count() {
        let (manager, _queue) = spy_manager();
        for name in ["a", "b", "c", "d", "e"] {
            manager.queue("q", &CountingJob::succeeding(name)).await.unwrap();
        }

        let listing = manager.list("q", 2).await.unwrap();

        assert_eq!(listing.queue(), "q");
        assert_eq!(listing.labels().len(), 2);
        assert_eq!(listing.total(), 5);
        assert_eq!(listing.omitted(), 3);
        assert_eq!(
            listing.lines(),
            vec!["counting a", "counting b", "(3 omitted) ...", "(5 total)"]
        );
        assert_eq!(manager.count("q").await.unwrap(), 5);
    }

    #[test]
    fn nothing_omitted_when_everything_fits() {
        let listing = QueueListing::new("q", vec!["one".into()], 1);
        assert_eq!(listing.to_string(), "one\n(1 total)");
    }

    #[test]
    fn empty_queue_only_shows_total() {
        let listing = QueueListing::new("q", Vec::new(), 0);
        assert_eq!(listing.lines(), vec!["(0 total)"]);
    }

    #[test]
    fn stale_count_does_not_underflow() {
        let listing = QueueListing::new("q", vec!["a".into(), "b".into()], 1);
        assert_eq!(listing.omitted(), 0);
    }
}
