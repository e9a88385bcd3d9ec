use std::rc::Rc;

use log::{debug, info};

use crate::evolution::EventType;

pub trait Observer<S: ?Sized, E> {
    fn update(&self, source: &S, event: &E);
}

pub trait Subject<E> {
    fn register_observer(&mut self, observer: Rc<dyn Observer<Self, E>>);
    fn unregister_observer(&mut self, observer: Rc<dyn Observer<Self, E>>);
    fn notify_observers(&self, event: E);
}

pub type Observers<S, E> = Vec<Rc<dyn Observer<S, E>>>;

/// Writes one line per generation through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressLogger;

impl<S: ?Sized> Observer<S, EventType> for ProgressLogger {
    fn update(&self, _: &S, event: &EventType) {
        match event {
            EventType::GenerationCompleted(progress) => info!(
                "Generation: {}, Best Fitness: {}",
                progress.generation, progress.best_fitness
            ),
            EventType::StatusChanged(status) => debug!("Evolution status: {status}"),
        }
    }
}

/// Forwards `(generation, best_fitness)` of every completed generation to a
/// closure.
pub struct ProgressCallback<F> {
    callback: F,
}

impl<F> ProgressCallback<F>
where
    F: Fn(u64, f32),
{
    pub fn new(callback: F) -> Self {
        ProgressCallback { callback }
    }
}

impl<S, F> Observer<S, EventType> for ProgressCallback<F>
where
    S: ?Sized,
    F: Fn(u64, f32),
{
    fn update(&self, _: &S, event: &EventType) {
        if let EventType::GenerationCompleted(progress) = event {
            (self.callback)(progress.generation, progress.best_fitness);
        }
    }
}
