//! Traits for state management.
//!
//! These traits define the common interface for all scene sub-stores.

/// Trait for creating immutable snapshots.
///
/// Snapshots are detached copies of state handed to the renderer or the
/// persistence collaborator. They decouple the stores from their readers.
pub trait Snapshot {
    /// The snapshot type produced.
    type Output;

    /// Creates an immutable snapshot.
    fn create_snapshot(&self) -> Self::Output;
}

/// Trait for time-stepped updates.
///
/// Subsystems driven by the frame scheduler implement this.
pub trait Update {
    /// Advances the state by one frame.
    ///
    /// # Arguments
    /// * `dt_ms` - Milliseconds elapsed since the previous step.
    fn update(&mut self, dt_ms: f64);
}

/// Reducer interface: every store mutates only through commands.
///
/// `apply` mutates in place and returns a command-specific outcome (for
/// example the id created by an add). `reduce` is the pure form,
/// `state' = reduce(state, command)`.
pub trait Apply<C> {
    type Outcome;

    fn apply(&mut self, command: C) -> Self::Outcome;

    fn reduce(mut self, command: C) -> Self
    where
        Self: Sized,
    {
        self.apply(command);
        self
    }
}
