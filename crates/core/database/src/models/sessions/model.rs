auto_derived!(
    /// Bearer session minted by the identity provider sync
    pub struct Session {
        /// Unique Id
        #[serde(rename = "_id")]
        pub id: String,
        /// Opaque session token presented by clients
        pub token: String,
        /// Id of the user this session belongs to
        pub user_id: String,
    }
);
