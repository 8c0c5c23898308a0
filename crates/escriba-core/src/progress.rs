//! Staged reveal of progress labels while an answer is pending.
//!
//! The reveal advances through a fixed sequence of labeled steps on its own
//! timers, purely cosmetic. The real call's completion cancels the
//! remaining timers through the token so the indicator reaches DONE the
//! moment the answer (or the error) actually arrives, instead of running on
//! a schedule unrelated to it. Dropping the future tears the reveal down
//! without firing the completion callback.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// One step of the reveal: a label and how long it stays current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealStep {
    pub label: String,
    pub duration: Duration,
}

impl RevealStep {
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }
}

/// The fixed sequence of progress labels shown while waiting for an answer.
pub fn default_steps() -> Vec<RevealStep> {
    vec![
        RevealStep::new("Analisando sua pergunta...", Duration::from_millis(2000)),
        RevealStep::new(
            "Pesquisando na base de Provimentos do CNJ...",
            Duration::from_millis(3000),
        ),
        RevealStep::new(
            "Consultando a base interna de precedentes...",
            Duration::from_millis(2000),
        ),
        RevealStep::new(
            "Sintetizando a resposta e buscando fundamentos legais...",
            Duration::from_millis(2000),
        ),
    ]
}

/// Sequential, cancellable reveal of progress steps.
pub struct StagedReveal {
    steps: Vec<RevealStep>,
}

impl StagedReveal {
    pub fn new(steps: Vec<RevealStep>) -> Self {
        Self { steps }
    }

    /// A reveal with the standard step sequence.
    pub fn standard() -> Self {
        Self::new(default_steps())
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    /// Runs the reveal to completion.
    ///
    /// `on_step` is called as each step becomes current; `on_done` is called
    /// exactly once, either after the last step's duration elapses or as
    /// soon as `cancel` fires (the real call finishing overtakes the
    /// simulated schedule). Consumes `self`, so a finished reveal cannot be
    /// re-triggered; dropping the returned future before it resolves fires
    /// neither callback again.
    pub async fn run(
        self,
        cancel: CancellationToken,
        mut on_step: impl FnMut(usize, &RevealStep),
        on_done: impl FnOnce(),
    ) {
        for (index, step) in self.steps.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }
            on_step(index, step);
            tokio::select! {
                _ = tokio::time::sleep(step.duration) => {}
                _ = cancel.cancelled() => break,
            }
        }
        on_done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn two_steps() -> StagedReveal {
        StagedReveal::new(vec![
            RevealStep::new("um", Duration::from_millis(100)),
            RevealStep::new("dois", Duration::from_millis(100)),
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn reaches_done_after_all_durations() {
        let seen = RefCell::new(Vec::new());
        let done = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        two_steps()
            .run(
                CancellationToken::new(),
                |index, step| seen.borrow_mut().push((index, step.label.clone())),
                || done.set(done.get() + 1),
            )
            .await;

        assert_eq!(done.get(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![(0, "um".to_string()), (1, "dois".to_string())]
        );
        // Never done before the second step's duration has elapsed.
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_jumps_straight_to_done() {
        let done = Cell::new(0u32);
        let token = CancellationToken::new();
        token.cancel();
        let started = tokio::time::Instant::now();

        two_steps()
            .run(token, |_, _| {}, || done.set(done.get() + 1))
            .await;

        assert_eq!(done.get(), 1);
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn mid_run_cancellation_skips_remaining_steps() {
        let seen = RefCell::new(Vec::new());
        let done = Cell::new(0u32);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            canceller.cancel();
        });

        two_steps()
            .run(
                token,
                |index, _| seen.borrow_mut().push(index),
                || done.set(done.get() + 1),
            )
            .await;

        assert_eq!(done.get(), 1);
        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_reveal_never_fires_done() {
        let done = Cell::new(0u32);
        {
            let future = two_steps().run(
                CancellationToken::new(),
                |_, _| {},
                || done.set(done.get() + 1),
            );
            drop(future);
        }
        assert_eq!(done.get(), 0);
    }

    #[test]
    fn standard_steps_are_fixed_at_construction() {
        let reveal = StagedReveal::standard();
        assert_eq!(reveal.steps().len(), 4);
        assert_eq!(reveal.steps()[1].duration, Duration::from_millis(3000));
    }
}
