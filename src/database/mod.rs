use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool otimizado
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        // Timeouts otimizados
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("EventService");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        // 🚀 Create indexes for performance + uniqueness constraints
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // Index for events: (host_id) - listagem de eventos do host
        let events = self.database().collection::<mongodb::bson::Document>("events");

        let events_host_index = IndexModel::builder()
            .keys(doc! { "host_id": 1 })
            .build();

        match events.create_index(events_host_index).await {
            Ok(_) => log::info!("   ✅ Index created: events(host_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let registrations = self.database().collection::<mongodb::bson::Document>("registrations");

        // Index: registrations(event_id) - lista de participantes e contagens do dashboard
        let registrations_event_index = IndexModel::builder()
            .keys(doc! { "event_id": 1 })
            .build();

        match registrations.create_index(registrations_event_index).await {
            Ok(_) => log::info!("   ✅ Index created: registrations(event_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // UNIQUE index: registrations(event_id, email) - uma inscrição por par.
        // O constraint no banco fecha a janela de corrida do check-then-insert.
        let registrations_unique_index = IndexModel::builder()
            .keys(doc! { "event_id": 1, "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match registrations.create_index(registrations_unique_index).await {
            Ok(_) => log::info!("   ✅ Unique index created: registrations(event_id, email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index: email_tracking(host_id, sent_at) - consulta da janela de quota de 24h
        let email_tracking = self.database().collection::<mongodb::bson::Document>("email_tracking");

        let tracking_window_index = IndexModel::builder()
            .keys(doc! { "host_id": 1, "sent_at": -1 })
            .build();

        match email_tracking.create_index(tracking_window_index).await {
            Ok(_) => log::info!("   ✅ Index created: email_tracking(host_id, sent_at)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index: email_tracking(message_id) - correlação do webhook do provedor
        let tracking_message_index = IndexModel::builder()
            .keys(doc! { "message_id": 1 })
            .build();

        match email_tracking.create_index(tracking_message_index).await {
            Ok(_) => log::info!("   ✅ Index created: email_tracking(message_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index: settings(host_id) - um documento de settings por host
        let settings = self.database().collection::<mongodb::bson::Document>("settings");

        let settings_host_index = IndexModel::builder()
            .keys(doc! { "host_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match settings.create_index(settings_host_index).await {
            Ok(_) => log::info!("   ✅ Unique index created: settings(host_id)"),
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

    pub fn client(&self) -> &Client {
        &self.client
    }
}
