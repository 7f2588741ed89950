//! Sequential id generation (`token-1`, `fog-7`, ...).

/// Hands out `<prefix>-<n>` ids with `n` strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct IdGenerator {
    prefix: &'static str,
    next: u64,
}

impl IdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        // Past u64::MAX the counter restarts; `next_free` skips collisions.
        self.next = self.next.checked_add(1).unwrap_or(1);
        id
    }

    /// Next id for which `taken` is false.
    pub fn next_free(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.next_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Moves the counter past every numeric suffix in `ids`, so restored
    /// entities never collide with newly created ones.
    pub fn reserve<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            let suffix = id.rsplit('-').next().unwrap_or(id);
            if let Ok(n) = suffix.parse::<u64>() {
                if let Some(after) = n.checked_add(1) {
                    self.next = self.next.max(after);
                }
            }
        }
    }
}
