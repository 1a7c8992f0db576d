/// Cachelayer API Demo
///
/// Walks through the coordinator the way a database-access layer would use it:
/// - Read-through caching under both strategies
/// - Full-text search over lesson titles
/// - Prioritized request queue with backpressure
/// - Query planning and metrics

use cachelayer::query::types::QueryParams;
use cachelayer::{CacheCoordinator, CacheStrategy, Config, Priority, RequestPayload};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        Cachelayer - Coordinator Demo          ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let config = Config::default().with_lru_capacity(100).with_lfu_capacity(100);
    let coordinator = CacheCoordinator::new(config)?;

    // Step 1: plan the query, then cache under the recommended strategy
    println!("Step 1: PLAN + CACHE");
    let mut params = QueryParams::new();
    params.insert("curriculum_id".to_string(), json!(7));
    let plan = coordinator.optimize_query(
        "SELECT * FROM lesson_plans WHERE curriculum_id = :curriculum_id",
        &params,
    )?;
    println!(
        "  complexity={} strategy={} ttl={}s",
        plan.complexity_score, plan.cache_strategy, plan.ttl_seconds
    );

    for attempt in 1..=2 {
        let rows: Result<_, cachelayer::Error> =
            coordinator.cache_get_or_load("curriculum:7", plan.cache_strategy, || {
                println!("  (attempt {}) loading from database...", attempt);
                Ok(Some(json!([{"id": 1, "title": "Fractions"}])))
            });
        println!("  attempt {}: {:?}", attempt, rows?);
    }

    // Step 2: search
    println!("\nStep 2: SEARCH");
    coordinator.add_search_document(1, "Introduction to fractions")?;
    coordinator.add_search_document(2, "Fractions and decimals")?;
    coordinator.add_search_document(3, "Photosynthesis basics")?;
    for hit in coordinator.search_documents("fractions decimals", 5)? {
        println!("  doc {} score {:.3}", hit.doc_id, hit.score);
    }

    // Step 3: request queue
    println!("\nStep 3: QUEUE");
    for (name, priority) in [("export", Priority::Low), ("generate", Priority::High)] {
        let mut payload = RequestPayload::new();
        payload.insert("job".to_string(), json!(name));
        println!("  enqueue {} -> {}", name, coordinator.add_request(payload, priority));
    }
    while let Some(payload) = coordinator.get_next_request() {
        println!("  dequeued {}", payload["job"]);
    }

    // Step 4: metrics
    println!("\nStep 4: METRICS");
    coordinator.cache_get("missing", CacheStrategy::Lfu)?;
    println!("{}", serde_json::to_string_pretty(&coordinator.get_metrics())?);
    println!("health: {:?}", coordinator.health_check().status);

    Ok(())
}
