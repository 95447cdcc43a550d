//! Worker Pool with Load Balancing
//!
//! Demonstrates building a supervised worker pool with load balancing, request/reply
//! messaging, and automatic failure recovery using OneForOne supervision strategy.
//!
//! # What You'll Learn
//!
//! - **Worker Pool Pattern**: Creating multiple worker instances for parallel processing
//! - **OneForOne Supervision**: Independent worker restart (failure doesn't affect siblings)
//! - **Load Balancing**: Round-robin task distribution across available workers
//! - **Request/Reply Pattern**: Synchronous message pattern with response channels
//! - **Failure Recovery**: Automatic worker restart without affecting other pool members
//! - **Resource Pooling**: Shared resource management across worker instances
//!
//! # Key Concepts
//!
//! ## Worker Pool Architecture
//!
//! ```text
//! Supervisor (OneForOne)
//!     ├─→ Worker-1 (processes tasks independently)
//!     ├─→ Worker-2 (processes tasks independently)
//!     ├─→ Worker-3 (processes tasks independently)
//!     └─→ Worker-N (processes tasks independently)
//!
//! Load Balancer (round-robin)
//!     └─→ Distributes tasks to workers
//! ```
//!
//! ## OneForOne Strategy Benefits
//!
//! - **Isolation**: Worker failure doesn't affect other workers
//! - **High Availability**: Pool continues processing with remaining workers
//! - **Fast Recovery**: Only failed worker restarts, not entire pool
//! - **Scalability**: Easy to add/remove workers dynamically
//!
//! ## Request/Reply Pattern
//!
//! ```rust
//! // Client sends request with response channel
//! let (tx, rx) = oneshot::channel();
//! worker.send(Request { data, reply_to: tx }).await;
//! let result = rx.await; // Wait for response
//! ```
//!
//! # Run This Example
//!
//! ```bash
//! cargo run --example worker_pool
//! ```
//!
//! # Expected Output
//!
//! ```text
//! === Worker Pool Example ===
//!
//! Creating worker pool with 3 workers...
//! [Worker-0] Starting
//! [Worker-1] Starting
//! [Worker-2] Starting
//! ✅ Worker pool ready with 3 workers
//!
//! Processing 10 tasks with load balancing...
//! [Worker-0] Processing task 1: compute(5) = 25
//! [Worker-1] Processing task 2: compute(7) = 49
//! [Worker-2] Processing task 3: compute(3) = 9
//! ...
//!
//! Simulating worker-1 failure...
//! [Worker-1] Stopping (failure simulation)
//! [Worker-1] Starting (automatic restart)
//! ✅ Worker-1 recovered
//!
//! === Statistics ===
//! Tasks processed: 10
//! Worker-0: 4 tasks
//! Worker-1: 3 tasks
//! Worker-2: 3 tasks
//! ```
//!
//! # See Also
//!
//! - [`supervisor_basic.rs`] - Basic supervisor and child management
//! - [`supervisor_strategies.rs`] - Strategy comparison (OneForOne vs OneForAll vs RestForOne)
//! - [`event_pipeline.rs`] - Event processing with RestForOne supervision
//! - [User Guide: Supervisor Patterns](../docs/src/guides/supervisor-patterns.md)

use airssys_cluster::monitoring::{InMemoryMonitor, MonitoringConfig};
use airssys_cluster::supervisor::{
    Child, ChildHealth, ChildId, ChildSpec, OneForOne, RestartPolicy, ShutdownPolicy, Supervisor,
    SupervisorNode,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

// =============================================================================
// Worker Pool Message Types
// =============================================================================

/// Task submitted to worker pool for processing.
///
/// Uses request/reply pattern with oneshot channel for synchronous response.
#[derive(Debug)]
struct WorkTask {
    id: u32,
    data: u32,
    reply_to: oneshot::Sender<WorkResult>,
}

/// Result returned from worker after processing task.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkResult {
    task_id: u32,
    result: u32,
    worker_id: String,
}

// =============================================================================
// Worker Implementation
// =============================================================================

/// Worker that processes tasks from the pool.
///
/// Each worker:
/// - Tracks processed task count
/// - Can simulate failures for testing
/// - Implements Child trait for supervision
#[derive(Debug)]
struct PoolWorker {
    id: String,
    processed_count: Arc<AtomicU32>, // Shared counter across restarts
    should_fail: Arc<AtomicU32>,     // Failure simulation trigger
}

#[derive(Debug)]
struct WorkerError {
    message: String,
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WorkerError: {}", self.message)
    }
}

impl std::error::Error for WorkerError {}

impl PoolWorker {
    /// Process a work task and send result via reply channel.
    ///
    /// Simulates CPU-bound work with simple computation.
    async fn process_task(&mut self, task: WorkTask) -> Result<(), WorkerError> {
        // Check if we should simulate failure
        let fail_trigger = self.should_fail.load(Ordering::Relaxed);
        if fail_trigger > 0 && self.processed_count.load(Ordering::Relaxed) >= fail_trigger {
            self.should_fail.store(0, Ordering::Relaxed); // Only fail once
            return Err(WorkerError {
                message: format!("[{}] Simulated failure during task {}", self.id, task.id),
            });
        }

        // Simulate CPU-bound work
        tokio::time::sleep(Duration::from_millis(100)).await;
        let result = task.data * task.data; // Simple computation

        println!(
            "[{}] Processing task {}: compute({}) = {}",
            self.id, task.id, task.data, result
        );

        // Send result back to caller
        let work_result = WorkResult {
            task_id: task.id,
            result,
            worker_id: self.id.clone(),
        };

        // Increment processed counter
        self.processed_count.fetch_add(1, Ordering::Relaxed);

        // Send result (ignore if receiver dropped)
        let _ = task.reply_to.send(work_result);

        Ok(())
    }
}

#[async_trait]
impl Child for PoolWorker {
    type Error = WorkerError;

    /// Initialize worker on start or restart.
    async fn start(&mut self) -> Result<(), Self::Error> {
        println!("[{}] Starting", self.id);
        Ok(())
    }

    /// Gracefully stop worker.
    async fn stop(&mut self, _timeout: Duration) -> Result<(), Self::Error> {
        println!(
            "[{}] Stopping (processed {} tasks)",
            self.id,
            self.processed_count.load(Ordering::Relaxed)
        );
        Ok(())
    }

    /// Report worker health status.
    async fn health_check(&self) -> ChildHealth {
        ChildHealth::Healthy
    }
}

// =============================================================================
// Load Balancer
// =============================================================================

/// Simple round-robin load balancer for distributing tasks to workers.
struct LoadBalancer {
    worker_ids: Vec<ChildId>,
    next_worker: AtomicUsize,
}

impl LoadBalancer {
    fn new(worker_ids: Vec<ChildId>) -> Self {
        Self {
            worker_ids,
            next_worker: AtomicUsize::new(0),
        }
    }

    /// Select next worker using round-robin strategy.
    fn next_worker(&self) -> &ChildId {
        let idx = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.worker_ids.len();
        &self.worker_ids[idx]
    }
}

// =============================================================================
// Main Example
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Worker Pool Example ===\n");

    // ==========================================================================
    // Step 1: Create supervisor with OneForOne strategy
    // ==========================================================================
    println!("Step 1: Creating worker pool with 3 workers...");
    let monitor = InMemoryMonitor::new(MonitoringConfig::default());
    let mut supervisor = SupervisorNode::<OneForOne, PoolWorker, _>::new(OneForOne, monitor);

    // Shared counters for each worker (persist across restarts)
    let worker_counts = [
        Arc::new(AtomicU32::new(0)),
        Arc::new(AtomicU32::new(0)),
        Arc::new(AtomicU32::new(0)),
    ];
    let worker_failures = [
        Arc::new(AtomicU32::new(0)),
        Arc::new(AtomicU32::new(0)),
        Arc::new(AtomicU32::new(0)),
    ];

    // ==========================================================================
    // Step 2: Start worker pool (3 workers)
    // ==========================================================================
    let mut worker_ids = Vec::new();

    for i in 0..3 {
        let worker_name = format!("Worker-{}", i);
        let count = Arc::clone(&worker_counts[i]);
        let fail = Arc::clone(&worker_failures[i]);

        let spec = ChildSpec {
            id: worker_name.clone(),
            factory: {
                let id = worker_name.clone();
                move || PoolWorker {
                    id: id.clone(),
                    processed_count: Arc::clone(&count),
                    should_fail: Arc::clone(&fail),
                }
            },
            restart_policy: RestartPolicy::Permanent, // Always restart failed workers
            shutdown_policy: ShutdownPolicy::Graceful(Duration::from_secs(5)),
            start_timeout: Duration::from_secs(10),
            shutdown_timeout: Duration::from_secs(10),
        };

        let child_id = supervisor.start_child(spec).await?;
        worker_ids.push(child_id);
    }

    println!("✅ Worker pool ready with {} workers\n", worker_ids.len());

    // ==========================================================================
    // Step 3: Create load balancer
    // ==========================================================================
    let balancer = LoadBalancer::new(worker_ids.clone());

    // ==========================================================================
    // Step 4: Process tasks with load balancing
    // ==========================================================================
    println!("Step 2: Processing 10 tasks with load balancing...");
    let mut tasks = Vec::new();

    for task_id in 1..=10 {
        let (tx, rx) = oneshot::channel();
        let task = WorkTask {
            id: task_id,
            data: task_id + 2,
            reply_to: tx,
        };

        // Select worker using load balancer
        let worker_id = balancer.next_worker();

        // Get worker and process task
        if let Some(handle) = supervisor.get_child_mut(worker_id) {
            let worker = handle.child_mut();
            if let Err(e) = worker.process_task(task).await {
                eprintln!("Task {} failed: {}", task_id, e);
                continue;
            }
        }

        tasks.push(rx);
    }

    // Collect results
    for rx in tasks {
        if let Ok(result) = rx.await {
            println!(
                "  ✓ Task {} completed by {} with result: {}",
                result.task_id, result.worker_id, result.result
            );
        }
    }
    println!();

    // ==========================================================================
    // Step 5: Simulate worker failure and automatic recovery
    // ==========================================================================
    println!("Step 3: Simulating Worker-1 failure...");
    worker_failures[1].store(1, Ordering::Relaxed); // Fail after processing 1 task

    // Process more tasks to trigger failure
    let (tx, _rx) = oneshot::channel();
    let task = WorkTask {
        id: 999,
        data: 10,
        reply_to: tx,
    };

    if let Some(handle) = supervisor.get_child_mut(&worker_ids[1]) {
        let worker = handle.child_mut();
        let _ = worker.process_task(task).await; // This will fail
    }

    // Supervisor automatically restarts failed worker (OneForOne strategy)
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("✅ Worker-1 automatically restarted by supervisor\n");

    // ==========================================================================
    // Step 6: Display statistics
    // ==========================================================================
    println!("=== Worker Pool Statistics ===");
    for (i, worker_id) in worker_ids.iter().enumerate() {
        let count = worker_counts[i].load(Ordering::Relaxed);
        println!("{}: {} tasks processed", worker_id, count);
    }
    println!();

    // ==========================================================================
    // Step 7: Cleanup
    // ==========================================================================
    println!("Step 4: Shutting down worker pool...");
    for worker_id in &worker_ids {
        supervisor.stop_child(worker_id).await?;
    }
    println!("✅ All workers stopped\n");

    println!("=== Worker Pool Example Complete! ===");
    println!("\nKey Learnings:");
    println!("  • Worker pools enable parallel task processing");
    println!("  • OneForOne supervision isolates failures to individual workers");
    println!("  • Load balancing distributes work across available workers");
    println!("  • Request/reply pattern provides synchronous task results");
    println!("  • Failed workers restart automatically without affecting pool");

    Ok(())
}
