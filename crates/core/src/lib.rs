pub mod config;
pub mod notify;
pub mod pipeline;
pub mod printing;
pub mod scheduler;
pub mod store;
pub mod testing;
pub mod transport;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, PrintBackend,
    RemoteBackend, SanitizedConfig,
};
pub use notify::{create_notice_system, Notice, NoticeWriter, NotifyHandle, RecentNotices};
pub use pipeline::{CycleReport, ItemReport, PipelineConfig, PrintPipeline, StepOutcome};
pub use printing::{
    print_to_targets, CupsPrintSink, DeliveryOutcome, DeviceOutcome, Document, LogPrintSink,
    PrintError, PrintSink,
};
pub use scheduler::{action, Action, PeriodicScheduler, SchedulerStatus, TaskState};
pub use store::{
    keys, CipherError, ConfigStore, MemoryConfigStore, SecretCipher, SettingsError,
    SettingsSnapshot, SqliteConfigStore, StoreError,
};
pub use transport::{
    FtpTransport, LocalDirTransport, RemoteEndpoint, RemoteItem, RemoteTransport, TransportError,
};
