//! Re-exports of the Chronos crates for the HTTP integration tests.

pub mod component {
    pub use chronos_core::error;
    pub use chronos_core::pagination;
    pub use chronos_core::recurrence;

    pub mod db {
        pub use chronos_db::db::*;
        pub use chronos_db::model;
    }

    pub mod service {
        pub use chronos_service::*;
    }

    pub mod middleware {
        pub use chronos_app::middleware::*;
    }

    // Re-export config from both core and app
    pub mod config {
        pub use chronos_app::config::ConfigHandler;
        pub use chronos_core::config::*;
    }
}

pub mod app {
    pub use chronos_app::*;

    pub mod api {
        pub use chronos_app::app::api::*;
    }
}
