//! Measure accumulators are summaries of model performance, such as classification accuracy.

use std::marker::PhantomData;

/// Trait implemented by performance measures
pub trait MeasureAccumulator<T> {
    /// initialize new measure
    fn new() -> Self;

    /// update with one prediction
    fn update_one(&mut self, known: &T, pred: &T);

    /// get resulting performance
    fn result(&self) -> f64;

    /// number of predictions seen so far
    fn count(&self) -> usize;

    /// update with multiple predictions
    fn update<'a, I>(&mut self, known: I, predicted: I)
    where
        I: Iterator<Item = &'a T>,
        T: 'a,
    {
        for (k, p) in known.zip(predicted) {
            self.update_one(k, p)
        }
    }
}

/// Classification Accuracy: relative amount of correctly classified labels
#[derive(Debug, Clone)]
pub struct PredictiveAccuracy<T> {
    n_correct: usize,
    n_wrong: usize,
    _t: PhantomData<T>,
}

impl<T> PredictiveAccuracy<T> {
    pub fn n_correct(&self) -> usize {
        self.n_correct
    }
}

impl<T> MeasureAccumulator<T> for PredictiveAccuracy<T>
where
    T: PartialEq,
{
    fn new() -> Self {
        PredictiveAccuracy {
            n_correct: 0,
            n_wrong: 0,
            _t: PhantomData,
        }
    }

    fn update_one(&mut self, known: &T, pred: &T) {
        if known == pred {
            self.n_correct += 1;
        } else {
            self.n_wrong += 1;
        }
    }

    /// 0 when nothing was predicted
    fn result(&self) -> f64 {
        let n = self.n_correct + self.n_wrong;
        if n == 0 {
            return 0.0;
        }
        self.n_correct as f64 / n as f64
    }

    fn count(&self) -> usize {
        self.n_correct + self.n_wrong
    }
}

/// accuracy of `predicted` against `known`
pub fn accuracy<T: PartialEq>(known: &[T], predicted: &[T]) -> f64 {
    let mut acc = <PredictiveAccuracy<T> as MeasureAccumulator<T>>::new();
    acc.update(known.iter(), predicted.iter());
    acc.result()
}

#[test]
fn accuracy_counts_matches() {
    let known = ["a", "b", "b", "c"];
    let pred = ["a", "b", "c", "c"];
    assert_eq!(accuracy(&known, &pred), 0.75);

    let mut acc = <PredictiveAccuracy<&str> as MeasureAccumulator<&str>>::new();
    assert_eq!(acc.result(), 0.0);
    acc.update_one(&"x", &"y");
    assert_eq!(acc.count(), 1);
    assert_eq!(acc.n_correct(), 0);
    assert_eq!(acc.result(), 0.0);
}
