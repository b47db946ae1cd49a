use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Database name comes from the URI path, falling back to the default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("studyhub");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the services rely on. Unique indexes back the
    /// duplicate checks done at signup time.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let unique = IndexOptions::builder().unique(true).build();

        let users = self.db.collection::<mongodb::bson::Document>("users");

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique.clone())
            .build();
        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let roll_index = IndexModel::builder()
            .keys(doc! { "rollNumber": 1 })
            .options(unique.clone())
            .build();
        match users.create_index(roll_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(rollNumber)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let admins = self.db.collection::<mongodb::bson::Document>("admins");
        let admin_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique)
            .build();
        match admins.create_index(admin_index).await {
            Ok(_) => log::info!("   ✅ Index created: admins(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Public listing filters on isActive and sorts by rating
        let alumni = self.db.collection::<mongodb::bson::Document>("alumni");
        let alumni_index = IndexModel::builder()
            .keys(doc! { "isActive": 1, "rating": -1 })
            .build();
        match alumni.create_index(alumni_index).await {
            Ok(_) => log::info!("   ✅ Index created: alumni(isActive, rating)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Resource listing filters on the classification hierarchy
        let resources = self.db.collection::<mongodb::bson::Document>("resources");
        let resources_index = IndexModel::builder()
            .keys(doc! { "branch": 1, "semester": 1, "category": 1 })
            .build();
        match resources.create_index(resources_index).await {
            Ok(_) => log::info!("   ✅ Index created: resources(branch, semester, category)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
