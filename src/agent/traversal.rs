use std::collections::{HashSet, VecDeque};

/// Bounded breadth-first traversal state shared by the site classifier
/// and the contact harvester: a visited set, a FIFO frontier, and a
/// hard step ceiling.
///
/// Invariants: no URL is handed out twice, a URL ever seen is never
/// re-enqueued, and at most `max_steps` URLs are handed out per run.
pub struct Traversal {
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    steps: usize,
    max_steps: usize,
}

impl Traversal {
    pub fn new(seed: String, max_steps: usize) -> Self {
        let mut visited = HashSet::new();
        visited.insert(seed.clone());
        let mut frontier = VecDeque::new();
        frontier.push_back(seed);
        Self {
            visited,
            frontier,
            steps: 0,
            max_steps,
        }
    }

    /// Pops the frontier head, consuming one step. Returns `None` once
    /// the frontier drains or the step ceiling is hit. A dead page
    /// still costs its step, so total crawl cost stays bounded.
    pub fn next(&mut self) -> Option<String> {
        if self.steps >= self.max_steps {
            return None;
        }
        let url = self.frontier.pop_front()?;
        self.steps += 1;
        Some(url)
    }

    /// Idempotent enqueue: anything already visited or already queued
    /// is dropped. Returns whether the URL was actually admitted.
    pub fn admit(&mut self, url: String) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_visited_and_served_first() {
        let mut traversal = Traversal::new("https://a.example/".to_string(), 15);
        assert!(!traversal.admit("https://a.example/".to_string()));
        assert_eq!(traversal.next().as_deref(), Some("https://a.example/"));
    }

    #[test]
    fn admission_is_idempotent_and_fifo() {
        let mut traversal = Traversal::new("seed".to_string(), 15);
        assert!(traversal.admit("b".to_string()));
        assert!(traversal.admit("c".to_string()));
        assert!(!traversal.admit("b".to_string()));

        let order: Vec<String> = std::iter::from_fn(|| traversal.next()).collect();
        assert_eq!(order, vec!["seed", "b", "c"]);

        // Even drained URLs may not come back
        assert!(!traversal.admit("c".to_string()));
    }

    #[test]
    fn step_ceiling_cuts_off_a_full_frontier() {
        let mut traversal = Traversal::new("u0".to_string(), 3);
        for i in 1..10 {
            traversal.admit(format!("u{}", i));
        }
        let mut served = 0;
        while traversal.next().is_some() {
            served += 1;
        }
        assert_eq!(served, 3);
        assert_eq!(traversal.steps_taken(), 3);
        assert!(traversal.frontier_len() > 0);
    }

    #[test]
    fn no_url_is_served_twice() {
        let mut traversal = Traversal::new("root".to_string(), 50);
        for i in 0..20 {
            traversal.admit(format!("page{}", i % 5));
        }
        let served: Vec<String> = std::iter::from_fn(|| traversal.next()).collect();
        let unique: std::collections::HashSet<&String> = served.iter().collect();
        assert_eq!(served.len(), unique.len());
    }
}
