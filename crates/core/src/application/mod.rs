// Application Layer - Use Cases and Business Logic

pub mod notification;
pub mod queue_service;
pub mod shutdown;

// Re-exports
pub use notification::NotificationDispatcher;
pub use queue_service::{
    CustomerPosition, DashboardStats, QueueService, QueueServiceConfig, QueueStatus,
};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
