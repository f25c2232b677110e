use std::{collections::HashMap, sync::Arc};

use futures::lock::Mutex;

use crate::{Comment, Issue, Notification, Report, ReportStats, Session, Upvote, User};

database_derived!(
    /// Reference implementation
    #[derive(Default)]
    pub struct ReferenceDb {
        pub users: Arc<Mutex<HashMap<String, User>>>,
        pub sessions: Arc<Mutex<HashMap<String, Session>>>,
        pub issues: Arc<Mutex<HashMap<String, Issue>>>,
        pub comments: Arc<Mutex<HashMap<String, Comment>>>,
        pub upvotes: Arc<Mutex<HashMap<String, Upvote>>>,
        pub issue_reports: Arc<Mutex<HashMap<String, Report>>>,
        pub notifications: Arc<Mutex<HashMap<String, Notification>>>,
        pub report_stats: Arc<Mutex<HashMap<String, ReportStats>>>,
    }
);
