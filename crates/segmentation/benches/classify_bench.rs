//! Benchmarks for the rule classifier and match scoring.
//! Run with: cargo bench -p segment-classifier

use segment_classifier::{AttributesBuilder, SegmentClassifier};
use segment_core::CustomerAttributes;

fn create_test_customers() -> Vec<CustomerAttributes> {
    (0..256)
        .map(|i| {
            let i = i as f64;
            AttributesBuilder::new()
                .age(18.0 + (i % 72.0))
                .income(i * 1_000.0)
                .total_spending(i * 20.0)
                .recency(i % 100.0)
                .customer_since(365.0 + i)
                .web_purchases(i % 12.0)
                .store_purchases(i % 9.0)
                .web_visits_per_month(i % 20.0)
                .build()
                .expect("bench customer is valid")
        })
        .collect()
}

fn main() {
    let classifier = SegmentClassifier::new();
    let customers = create_test_customers();

    // Warmup
    for customer in &customers {
        let _ = classifier.classify(customer);
    }

    // Benchmark
    let iterations = 10_000u32;
    let start = std::time::Instant::now();

    for _ in 0..iterations {
        for customer in &customers {
            let _ = classifier.classify(customer);
        }
    }

    let elapsed = start.elapsed();
    let calls = iterations as f64 * customers.len() as f64;

    println!("=== Classification Benchmark ===");
    println!("Iterations:  {}", iterations);
    println!("Customers:   {}", customers.len());
    println!("Total time:  {:?}", elapsed);
    println!("Per call:    {:?}", elapsed / (iterations * customers.len() as u32));
    println!("Throughput:  {:.0} classifications/sec", calls / elapsed.as_secs_f64());
}
