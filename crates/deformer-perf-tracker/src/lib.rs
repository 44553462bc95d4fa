use std::{collections::VecDeque, time::Duration};
use web_time::Instant;

/// Rolling statistics over the last evaluation passes.
#[derive(Debug)]
pub struct EvaluationTracker {
    samples: usize,
    evaluation_time: VecDeque<Duration>,
    evaluation_timestamp: VecDeque<Instant>,
    evaluation_time_sum: Duration,
}

impl EvaluationTracker {
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(1),
            evaluation_time: VecDeque::new(),
            evaluation_timestamp: VecDeque::new(),
            evaluation_time_sum: Duration::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.evaluation_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluation_time.is_empty()
    }

    pub fn avg_time(&self) -> Option<Duration> {
        if self.evaluation_time.is_empty() {
            None
        } else {
            Some(self.evaluation_time_sum / self.evaluation_time.len() as u32)
        }
    }

    pub fn last_time(&self) -> Option<&Duration> {
        self.evaluation_time.back()
    }

    pub fn add_sample(&mut self, evaluation_time: Duration, timestamp: Instant) {
        self.evaluation_time.push_back(evaluation_time);
        self.evaluation_time_sum += evaluation_time;
        while self.evaluation_time.len() > self.samples {
            if let Some(oldest) = self.evaluation_time.pop_front() {
                self.evaluation_time_sum -= oldest;
            }
        }

        self.evaluation_timestamp.push_back(timestamp);
        while self.evaluation_timestamp.len() > self.samples {
            self.evaluation_timestamp.pop_front();
        }
    }

    /// Measure `evaluate` and record it as a sample.
    pub fn measure<T>(&mut self, evaluate: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = evaluate();
        self.add_sample(start.elapsed(), start);
        result
    }

    /// Rate of evaluations between the oldest and newest sample timestamps.
    pub fn evaluations_per_second(&self) -> Option<f64> {
        self.evaluation_timestamp
            .front()
            .zip(self.evaluation_timestamp.back())
            .filter(|(first, last)| first != last)
            .map(|(first, last)| {
                let intervals = self.evaluation_timestamp.len() - 1;
                let duration = *last - *first;
                let avg_duration = duration.as_secs_f64() / intervals as f64;
                1.0 / avg_duration
            })
    }
}
