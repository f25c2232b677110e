use crate::MongoDb;

use super::AbstractMigrations;

#[async_trait]
impl AbstractMigrations for MongoDb {
    #[cfg(test)]
    /// Drop the database
    async fn drop_database(&self) {
        self.db().drop().await.ok();
    }

    /// Migrate the database
    async fn migrate_database(&self) -> Result<(), ()> {
        info!("Migrating the database.");

        let db = self.db();

        // A user may report a given issue at most once; concurrent
        // submissions race on this index rather than on application checks
        db.run_command(doc! {
            "createIndexes": "issue_reports",
            "indexes": [
                {
                    "key": {
                        "issue_id": 1_i32,
                        "reporter_id": 1_i32
                    },
                    "name": "issue_reporter",
                    "unique": true
                },
                {
                    "key": {
                        "status": 1_i32,
                        "created_at": -1_i32
                    },
                    "name": "status_created_at",
                    "unique": false
                },
                {
                    "key": {
                        "issue_id": 1_i32,
                        "status": 1_i32
                    },
                    "name": "issue_status",
                    "unique": false
                },
                {
                    "key": {
                        "reporter_id": 1_i32,
                        "created_at": -1_i32
                    },
                    "name": "reporter_created_at",
                    "unique": false
                }
            ]
        })
        .await
        .expect("Failed to create issue_reports indexes.");

        db.run_command(doc! {
            "createIndexes": "notifications",
            "indexes": [
                {
                    "key": {
                        "user_id": 1_i32,
                        "read": 1_i32,
                        "created_at": -1_i32
                    },
                    "name": "user_read_created_at",
                    "unique": false
                },
                {
                    "key": {
                        "user_id": 1_i32,
                        "created_at": -1_i32
                    },
                    "name": "user_created_at",
                    "unique": false
                }
            ]
        })
        .await
        .expect("Failed to create notifications indexes.");

        db.run_command(doc! {
            "createIndexes": "sessions",
            "indexes": [
                {
                    "key": {
                        "token": 1_i32
                    },
                    "name": "token",
                    "unique": true
                }
            ]
        })
        .await
        .expect("Failed to create sessions indexes.");

        Ok(())
    }
}
