#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;

use std::convert::Infallible;
use std::future::Future;

use prometheus::{Encoder, Histogram, HistogramVec, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    static ref SUCCESS: IntCounterVec = register_int_counter_vec!(
        "success_counter",
        "Success Count",
        &["app_layer", "class_function"]
    )
    .unwrap();
    static ref FAILURE: IntCounterVec = register_int_counter_vec!(
        "failure_counter",
        "Failure Count",
        &["app_layer", "class_function"]
    )
    .unwrap();
    static ref REJECTED: IntCounterVec = register_int_counter_vec!(
        "rejected_counter",
        "Rejected Request Count",
        &["app_layer", "class_function", "reason"]
    )
    .unwrap();
    static ref TIMER: HistogramVec =
        register_histogram_vec!("timer", "Call Duration", &["app_layer", "class_function"])
            .unwrap();
}

// This trait allows errors caused by the caller to not be considered failures
pub trait IsErr {
    fn is_err(&self) -> bool {
        true
    }

    /// Label recorded against the rejection counter when `is_err` is false
    fn reason(&self) -> &str {
        "unknown"
    }
}

impl IsErr for Infallible {
    fn is_err(&self) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct Measure {
    layer: String,
    function: String,
    success: IntCounter,
    failure: IntCounter,
    timer: Histogram,
}

impl Measure {
    pub fn new(layer: &str, function: &str) -> Measure {
        Measure {
            layer: layer.to_string(),
            function: function.to_string(),
            success: SUCCESS.with_label_values(&[layer, function]),
            failure: FAILURE.with_label_values(&[layer, function]),
            timer: TIMER.with_label_values(&[layer, function]),
        }
    }

    pub async fn stats<F, T, E>(&self, inner: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: IsErr,
    {
        let timer = self.timer.start_timer();
        let r = inner.await;
        timer.observe_duration();
        self.record(&r);
        r
    }

    /// Synchronous counterpart to `stats`
    pub fn observe<F, T, E>(&self, inner: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: IsErr,
    {
        let timer = self.timer.start_timer();
        let r = inner();
        timer.observe_duration();
        self.record(&r);
        r
    }

    fn record<T, E: IsErr>(&self, r: &Result<T, E>) {
        match r {
            Ok(_) => self.success.inc(),
            Err(e) if !e.is_err() => {
                self.success.inc();
                REJECTED
                    .with_label_values(&[self.layer.as_str(), self.function.as_str(), e.reason()])
                    .inc();
            }
            Err(_) => self.failure.inc(),
        }
    }
}

pub fn encode() -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tokio::time::Duration;

    use super::*;

    enum TestError {
        Fatal,
        Recoverable,
    }

    impl IsErr for TestError {
        fn is_err(&self) -> bool {
            match self {
                Self::Fatal => true,
                Self::Recoverable => false,
            }
        }

        fn reason(&self) -> &str {
            "recoverable"
        }
    }

    fn rejected(layer: &str, function: &str) -> u64 {
        REJECTED
            .with_label_values(&[layer, function, "recoverable"])
            .get()
    }

    #[tokio::test]
    async fn test_success() {
        let layer = "layer";
        let function = "test_success";

        let m = Measure::new(layer, function);

        let f = async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, Infallible>("")
        };

        let _ = m.stats(f).await;

        assert_eq!(SUCCESS.with_label_values(&[layer, function]).get(), 1);
        assert_eq!(FAILURE.with_label_values(&[layer, function]).get(), 0);
        assert_eq!(
            TIMER
                .with_label_values(&[layer, function])
                .get_sample_count(),
            1
        );
        assert!(
            TIMER
                .with_label_values(&[layer, function])
                .get_sample_sum()
                >= 0.05
        );
    }

    #[tokio::test]
    async fn test_failure() {
        let layer = "layer";
        let function = "test_failure";

        let m = Measure::new(layer, function);

        let f = async move { Err::<(), _>(TestError::Fatal) };

        let _ = m.stats(f).await;

        assert_eq!(SUCCESS.with_label_values(&[layer, function]).get(), 0);
        assert_eq!(FAILURE.with_label_values(&[layer, function]).get(), 1);
        assert_eq!(rejected(layer, function), 0);
        assert_eq!(
            TIMER
                .with_label_values(&[layer, function])
                .get_sample_count(),
            1
        );
    }

    #[tokio::test]
    async fn test_recoverable() {
        let layer = "layer";
        let function = "test_recoverable";

        let m = Measure::new(layer, function);

        let f = async move { Err::<(), _>(TestError::Recoverable) };

        let _ = m.stats(f).await;

        assert_eq!(SUCCESS.with_label_values(&[layer, function]).get(), 1);
        assert_eq!(FAILURE.with_label_values(&[layer, function]).get(), 0);
        assert_eq!(rejected(layer, function), 1);
    }

    #[test]
    fn test_observe() {
        let layer = "layer";
        let function = "test_observe";

        let m = Measure::new(layer, function);

        let _ = m.observe(|| Ok::<_, Infallible>(1));
        let _ = m.observe(|| Err::<(), _>(TestError::Recoverable));
        let _ = m.observe(|| Err::<(), _>(TestError::Fatal));

        assert_eq!(SUCCESS.with_label_values(&[layer, function]).get(), 2);
        assert_eq!(FAILURE.with_label_values(&[layer, function]).get(), 1);
        assert_eq!(rejected(layer, function), 1);
        assert_eq!(
            TIMER
                .with_label_values(&[layer, function])
                .get_sample_count(),
            3
        );
    }

    #[test]
    fn test_encode() -> Result<(), Box<dyn std::error::Error>> {
        let m = Measure::new("layer", "test_encode");
        let _ = m.observe(|| Ok::<_, Infallible>(()));

        let encoded = encode()?;
        assert!(encoded.contains("test_encode"));
        Ok(())
    }
}
