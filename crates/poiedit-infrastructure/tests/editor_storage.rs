use async_trait::async_trait;
use poiedit_application::{EditState, EditorContext, EditorService};
use poiedit_core::config::EditorConfig;
use poiedit_core::error::{PoiError, Result};
use poiedit_core::gateway::{
    Callback, ChoiceSet, Inbound, MessageBody, MessageHandle, MessagingGateway, OutgoingMessage,
};
use poiedit_core::poi::{BoundingBox, CatalogStore, House, Location};
use poiedit_infrastructure::{
    ConfigIdentityProvider, FsPhotoStore, TomlCatalogStore, TomlTextResolver, TracingNotifier,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingGateway {
    sent: Mutex<Vec<OutgoingMessage>>,
}

impl RecordingGateway {
    fn last_text(&self) -> String {
        match self.sent.lock().unwrap().last().map(|m| m.body.clone()) {
            Some(MessageBody::Text { text }) => text,
            other => panic!("expected text, got {:?}", other),
        }
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send(&self, _user: &str, message: OutgoingMessage) -> Result<MessageHandle> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        Ok(MessageHandle(sent.len() as i64))
    }

    async fn send_album(&self, _user: &str, photos: &[String]) -> Result<Vec<MessageHandle>> {
        Ok(photos.iter().map(|_| MessageHandle(0)).collect())
    }

    async fn edit_choices(&self, _: &str, _: MessageHandle, _: ChoiceSet) -> Result<()> {
        Ok(())
    }

    async fn retract(&self, _user: &str, _handles: &[MessageHandle]) -> Result<()> {
        Ok(())
    }

    async fn notice(&self, _user: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn fetch_upload(&self, upload_id: &str) -> Result<Vec<u8>> {
        Err(PoiError::not_found("Upload", upload_id))
    }
}

struct Setup {
    _dir: TempDir,
    catalog_path: std::path::PathBuf,
    service: EditorService,
    gateway: Arc<RecordingGateway>,
}

fn setup() -> Setup {
    let dir = TempDir::new().unwrap();
    let config = EditorConfig {
        bbox: Some(BoundingBox::from([27.4, 53.8, 27.8, 54.0])),
        moderators: vec!["mod".into()],
        catalog_path: dir.path().join("catalog.toml"),
        photos_dir: dir.path().join("photos"),
        ..EditorConfig::default()
    };

    let catalog = TomlCatalogStore::new(&config.catalog_path);
    catalog
        .put_house(House {
            key: "h1".into(),
            name: "Tower".into(),
            location: Location::new(53.9, 27.6),
        })
        .unwrap();

    let gateway = Arc::new(RecordingGateway::default());
    let ctx = EditorContext::new(
        Arc::new(catalog),
        gateway.clone(),
        Arc::new(TomlTextResolver::builtin().unwrap()),
        Arc::new(TracingNotifier),
        Arc::new(FsPhotoStore::new(&config.photos_dir)),
        Arc::new(config.clone()),
    );
    let identity = Arc::new(ConfigIdentityProvider::new(&config));

    Setup {
        catalog_path: config.catalog_path.clone(),
        _dir: dir,
        service: EditorService::new(Arc::new(ctx), identity),
        gateway,
    }
}

async fn say(service: &EditorService, user: &str, text: &str) {
    service.handle(user, Inbound::from_text(text)).await.unwrap();
}

async fn choose(service: &EditorService, user: &str, callback: Callback) {
    service.handle(user, Inbound::choice(callback)).await.unwrap();
}

#[tokio::test]
async fn test_moderator_creates_poi_on_disk() {
    let s = setup();
    choose(&s.service, "mod", Callback::New).await;
    say(&s.service, "mod", "Corner bakery").await;
    say(&s.service, "mod", "53.9, 27.6").await;
    say(&s.service, "mod", "bread cakes").await;
    say(&s.service, "mod", "/ehour").await;
    say(&s.service, "mod", "mo-fr 8-20, sa 9-15").await;
    choose(&s.service, "mod", Callback::Save).await;

    assert_eq!(s.service.state("mod").await, None);
    assert_eq!(s.gateway.last_text(), "Saved! Thank you.");

    // A fresh store over the same file sees the POI
    let reopened = TomlCatalogStore::new(&s.catalog_path);
    let poi = reopened.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(poi.name, "Corner bakery");
    assert_eq!(poi.keywords, vec!["bread", "cakes"]);
    assert_eq!(
        poi.hours_src.as_deref(),
        Some("Mo-Fr 08:00-20:00; Sa 09:00-15:00")
    );
    assert_eq!(
        poi.hours.map(|h| h.canonical()).as_deref(),
        Some("Mo-Fr 08:00-20:00; Sa 09:00-15:00")
    );
    assert!(!poi.needs_check);
}

#[tokio::test]
async fn test_user_edit_lands_in_review_queue() {
    let s = setup();
    choose(&s.service, "mod", Callback::New).await;
    say(&s.service, "mod", "Pharmacy").await;
    say(&s.service, "mod", "53.91, 27.61").await;
    say(&s.service, "mod", "drugs").await;
    choose(&s.service, "mod", Callback::Save).await;

    choose(&s.service, "guest", Callback::Edit { poi_id: 1 }).await;
    assert_eq!(s.service.state("guest").await, Some(EditState::Confirm));
    say(&s.service, "guest", "/ehouse").await;
    choose(&s.service, "guest", Callback::House { key: "h1".into() }).await;
    choose(&s.service, "guest", Callback::Save).await;

    let reopened = TomlCatalogStore::new(&s.catalog_path);
    let queue = reopened.review_queue().unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].user_id, "guest");
    assert_eq!(queue[0].poi.house_name.as_deref(), Some("Tower"));
    // The catalog copy is untouched until a moderator accepts it
    let stored = reopened.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.house, None);
}

#[tokio::test]
async fn test_delete_reason_is_stored() {
    let s = setup();
    choose(&s.service, "mod", Callback::New).await;
    say(&s.service, "mod", "Kiosk").await;
    say(&s.service, "mod", "53.9, 27.6").await;
    say(&s.service, "mod", "newspapers").await;
    choose(&s.service, "mod", Callback::Save).await;

    choose(&s.service, "guest", Callback::Edit { poi_id: 1 }).await;
    say(&s.service, "guest", "/delete").await;
    say(&s.service, "guest", "closed in spring").await;
    assert_eq!(s.service.state("guest").await, None);

    let reopened = TomlCatalogStore::new(&s.catalog_path);
    let stored = reopened.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.delete_reason.as_deref(), Some("closed in spring"));
}

#[tokio::test]
async fn test_unreadable_catalog_keeps_the_draft() {
    let s = setup();
    choose(&s.service, "mod", Callback::New).await;
    say(&s.service, "mod", "Bookshop").await;
    say(&s.service, "mod", "53.9, 27.6").await;
    say(&s.service, "mod", "books").await;
    say(&s.service, "mod", "/edesc").await;
    say(&s.service, "mod", "Second-hand books").await;

    std::fs::write(&s.catalog_path, "not = [valid toml").unwrap();
    say(&s.service, "mod", "/ehouse").await;

    assert_eq!(s.service.state("mod").await, Some(EditState::Confirm));
    assert!(s.gateway.last_text().starts_with("Could not read the catalog:"));
    let draft = s.service.draft("mod").await.unwrap();
    assert_eq!(draft.description.as_deref(), Some("Second-hand books"));
}
