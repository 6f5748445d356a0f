//! Page controllers, edit dialog and view components.

use autoparts_inventory::app::pages::{
    ActionState, AddItemPage, DashboardPage, DeleteOutcome, EditDialog, PartDelta, PartListCache,
    RemoveItemPage, SearchPage,
};
use autoparts_inventory::app::view::{ImageOverlay, NavBar, OverlayEvent, Route};
use autoparts_inventory::domain::part::filter::CategoryFilter;
use autoparts_inventory::domain::part::PartForm;
use autoparts_inventory::{
    ErrorKind, ImageFile, InMemoryBackend, Part, PartInput, PartRepository, PartType,
};
use std::sync::Arc;

fn setup() -> (Arc<InMemoryBackend>, PartRepository) {
    let backend = Arc::new(InMemoryBackend::default());
    let repository = PartRepository::new(backend.clone(), backend.clone());
    (backend, repository)
}

fn png() -> ImageFile {
    ImageFile::new("photo.png", "image/png", vec![7; 64])
}

async fn seed(repo: &PartRepository, part_type: PartType, brand: &str, model: &str, stock: &str) -> Part {
    repo.create(
        &PartInput {
            part_type,
            car_brand: brand.to_string(),
            car_model: model.to_string(),
            car_year: 2020,
            stock_number: stock.to_string(),
        },
        &png(),
    )
    .await
    .expect("seed part")
}

fn filled_form(stock: &str) -> PartForm {
    PartForm {
        part_type: PartType::Headlight,
        car_brand: "Nissan".into(),
        car_model: "Altima".into(),
        car_year: "2019".into(),
        stock_number: stock.into(),
    }
}

#[tokio::test]
async fn dashboard_category_filter_matches_summary_tile() {
    let (_backend, repo) = setup();
    seed(&repo, PartType::DashKit, "Toyota", "Camry", "D1").await;
    seed(&repo, PartType::WiringHarness, "Honda", "Fit", "W1").await;
    seed(&repo, PartType::WiringHarness, "Ford", "Ranger", "W2").await;
    seed(&repo, PartType::Headlight, "BMW", "X5", "H1").await;

    let mut page = DashboardPage::new(repo);
    page.load().await.unwrap();
    assert_eq!(page.list.fetch_state, ActionState::Success);

    page.set_filter(CategoryFilter::Only(PartType::WiringHarness));
    let visible = page.visible();
    assert!(visible.iter().all(|p| p.part_type == PartType::WiringHarness));
    assert_eq!(visible.len(), 2);

    let summary = page.summary();
    assert_eq!(summary.count(page.filter()), visible.len());
    // Tiles count the whole inventory, not the filtered view.
    assert_eq!(summary.total, 4);
    assert_eq!(summary.dash_kits, 1);
    assert_eq!(summary.headlights, 1);
}

#[tokio::test]
async fn delete_needs_confirmation_and_updates_the_cached_list() {
    let (backend, repo) = setup();
    let a = seed(&repo, PartType::DashKit, "Kia", "Soul", "K1").await;
    let b = seed(&repo, PartType::DashKit, "Kia", "Rio", "K2").await;

    let mut page = DashboardPage::new(repo.clone());
    page.load().await.unwrap();

    let calls = backend.remote_calls();
    assert_eq!(page.delete(&a.id, false).await.unwrap(), DeleteOutcome::Cancelled);
    assert_eq!(backend.remote_calls(), calls);
    assert_eq!(page.list.parts().len(), 2);

    assert_eq!(page.delete(&a.id, true).await.unwrap(), DeleteOutcome::Deleted);
    assert_eq!(page.list.delete_state, ActionState::Success);
    let ids: Vec<_> = page.list.parts().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![b.id.clone()]);
    assert!(repo.list(None).await.unwrap().iter().all(|p| p.id != a.id));
}

#[tokio::test]
async fn remove_item_search_spans_brand_model_and_stock() {
    let (_backend, repo) = setup();
    seed(&repo, PartType::DashKit, "Subaru", "Outback", "SB-100").await;
    seed(&repo, PartType::Headlight, "Chevy", "Malibu", "CH-200").await;
    seed(&repo, PartType::WiringHarness, "Jeep", "Wrangler", "sb-300").await;

    let mut page = RemoveItemPage::new(repo);
    page.load().await.unwrap();
    assert_eq!(page.visible().len(), 3);

    page.set_search_term("SB-");
    let stocks: Vec<_> = page.visible().into_iter().map(|p| p.stock_number).collect();
    assert_eq!(stocks, vec!["sb-300", "SB-100"]);

    page.set_search_term("malibu");
    assert_eq!(page.visible().len(), 1);
}

#[tokio::test]
async fn edit_dialog_reports_update_back_to_the_page() {
    let (_backend, repo) = setup();
    let part = seed(&repo, PartType::Headlight, "Audi", "A3", "AU-1").await;

    let mut page = RemoveItemPage::new(repo.clone());
    page.load().await.unwrap();

    let mut dialog = EditDialog::open(repo.clone(), part.clone());
    assert_eq!(dialog.form.car_year, "2020");
    dialog.form.car_model = "A3 Sportback".into();
    let updated = dialog.submit().await.unwrap();
    assert_eq!(updated.image_url, part.image_url);
    assert_eq!(dialog.state, ActionState::Success);

    page.apply_update(updated.clone());
    assert_eq!(page.list.parts()[0].car_model, "A3 Sportback");
}

#[tokio::test]
async fn edit_dialog_cancel_persists_nothing() {
    let (backend, repo) = setup();
    let part = seed(&repo, PartType::DashKit, "Mini", "Cooper", "MC-1").await;
    let calls = backend.remote_calls();

    let mut dialog = EditDialog::open(repo.clone(), part.clone());
    dialog.form.car_brand = "Changed".into();
    dialog.select_image(png()).unwrap();
    let original = dialog.cancel();

    assert_eq!(original, part);
    assert_eq!(backend.remote_calls(), calls);
    assert_eq!(repo.get(&part.id).await.unwrap().car_brand, "Mini");
}

#[tokio::test]
async fn failed_update_leaves_the_cached_list_untouched() {
    let (backend, repo) = setup();
    let part = seed(&repo, PartType::WiringHarness, "Volvo", "XC90", "VO-1").await;

    let mut page = DashboardPage::new(repo.clone());
    page.load().await.unwrap();
    let before = page.list.parts().to_vec();

    backend.set_fail_uploads(true);
    let mut dialog = EditDialog::open(repo.clone(), part.clone());
    dialog.form.car_model = "XC60".into();
    dialog.select_image(png()).unwrap();
    let err = dialog.submit().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upload);
    assert!(matches!(dialog.state, ActionState::Error(_)));
    assert!(dialog.has_new_image());

    assert_eq!(page.list.parts(), before.as_slice());
    assert_eq!(repo.get(&part.id).await.unwrap().car_model, "XC90");
}

#[tokio::test]
async fn add_item_clears_on_success_and_keeps_fields_on_failure() {
    let (backend, repo) = setup();
    seed(&repo, PartType::DashKit, "Lexus", "IS", "DUP-1").await;

    let mut page = AddItemPage::new(repo.clone());
    page.form = filled_form("DUP-1");

    // No image yet.
    let err = page.submit().await.unwrap_err();
    assert_eq!(
        err,
        autoparts_inventory::PartError::validation("Please fill in all fields and upload an image")
    );

    page.select_image(png()).unwrap();
    let err = page.submit().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(page.form, filled_form("DUP-1"));
    assert!(page.image().is_some());
    assert_eq!(page.progress(), 0);

    page.form.stock_number = "NEW-1".into();
    let created = page.submit().await.unwrap();
    assert_eq!(created.stock_number, "NEW-1");
    assert_eq!(created.part_type, PartType::Headlight);
    assert_eq!(page.form, PartForm::default());
    assert!(page.image().is_none());
    assert_eq!(page.state, ActionState::Success);

    let calls = backend.remote_calls();
    let rejected = page.select_image(ImageFile::new("clip.mp4", "video/mp4", vec![0; 10]));
    assert!(rejected.is_err());
    assert!(page.image().is_none());
    assert_eq!(backend.remote_calls(), calls);
}

#[tokio::test]
async fn search_page_groups_remote_results() {
    let (_backend, repo) = setup();
    seed(&repo, PartType::Headlight, "Toyota", "Tacoma", "T1").await;
    seed(&repo, PartType::DashKit, "Toyota", "Tundra", "T2").await;
    seed(&repo, PartType::DashKit, "Dodge", "Ram", "D1").await;

    let mut page = SearchPage::new(repo);
    assert!(!page.searched());
    page.brand = "toyota".into();
    let found = page.submit().await.unwrap().len();
    assert_eq!(found, 2);
    assert!(page.searched());

    let groups = page.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].part_type, PartType::DashKit);
    assert_eq!(groups[0].count, 1);
    assert_eq!(groups[1].label, "Headlights");

    page.year = "twenty".into();
    let err = page.submit().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    // Earlier results survive a failed search.
    assert_eq!(page.results().len(), 2);
}

#[test]
fn part_list_cache_applies_deltas_in_place() {
    let now = chrono::Utc::now();
    let make = |id: &str, model: &str| Part {
        id: id.into(),
        part_type: PartType::DashKit,
        car_brand: "B".into(),
        car_model: model.into(),
        car_year: 2001,
        stock_number: id.into(),
        image_url: "u".into(),
        created_at: now,
        updated_at: now,
    };
    let mut cache = PartListCache::new(vec![make("1", "a"), make("2", "b")]);

    cache.apply(PartDelta::Replaced(make("2", "bb")));
    cache.apply(PartDelta::Added(make("3", "c")));
    cache.apply(PartDelta::Removed("1".into()));
    cache.apply(PartDelta::Replaced(make("404", "ghost")));

    let models: Vec<_> = cache.parts().iter().map(|p| p.car_model.as_str()).collect();
    assert_eq!(models, vec!["c", "bb"]);
}

#[test]
fn nav_bar_highlights_exact_route_and_toggles_on_scroll() {
    let mut nav = NavBar::for_path("/dashboard");
    assert_eq!(nav.active().map(|l| l.label.as_str()), Some("Dashboard"));
    assert_eq!(nav.links.iter().filter(|l| l.active).count(), 1);

    nav.on_scroll(20.0);
    assert!(!nav.scrolled);
    nav.on_scroll(21.0);
    assert!(nav.scrolled);
    nav.on_scroll(0.0);
    assert!(!nav.scrolled);

    assert!(NavBar::for_path("/nowhere").active().is_none());
    assert_eq!(Route::resolve("/"), Route::Search);
    assert_eq!(Route::resolve("/search"), Route::Search);
    assert_eq!(Route::resolve("/remove-item/"), Route::RemoveItem);
    assert_eq!(Route::resolve("/parts"), Route::NotFound);

    // Trailing slashes resolve and highlight like the canonical path.
    assert_eq!(
        NavBar::for_path("/search/").active().map(|l| l.path.as_str()),
        Some("/search")
    );
    assert_eq!(NavBar::for_path("/").active().map(|l| l.label.as_str()), Some("Home"));
}

#[tokio::test]
async fn pages_expand_images_in_their_own_overlay() {
    let (_backend, repo) = setup();
    let part = seed(&repo, PartType::Headlight, "Mazda", "3", "MZ-1").await;

    let mut search = SearchPage::new(repo.clone());
    search.brand = "mazda".into();
    search.submit().await.unwrap();
    let url = search.results()[0].image_url.clone();
    search.expand_image(&url);
    assert!(search.overlay.scroll_locked());
    assert!(!search.overlay_event(OverlayEvent::ClickImage));
    assert!(search.overlay_event(OverlayEvent::Key("Escape")));
    assert!(!search.overlay.is_open());

    let mut dashboard = DashboardPage::new(repo);
    dashboard.load().await.unwrap();
    dashboard.list.expand_image(&part.image_url);
    assert_eq!(dashboard.list.overlay.image_url(), Some(part.image_url.as_str()));
    // Overlays are page-local.
    assert!(!search.overlay.is_open());
    assert!(dashboard.list.overlay_event(OverlayEvent::ClickOutside));
    assert!(!dashboard.list.overlay.scroll_locked());
}

#[test]
fn image_overlay_closes_on_outside_click_button_or_escape() {
    let mut overlay = ImageOverlay::default();
    assert!(!overlay.scroll_locked());
    assert!(!overlay.handle(OverlayEvent::Key("Escape")));

    overlay.open("https://img/1.png");
    assert!(overlay.scroll_locked());
    assert!(!overlay.handle(OverlayEvent::ClickImage));
    assert!(!overlay.handle(OverlayEvent::Key("Enter")));
    assert!(overlay.is_open());
    assert!(overlay.handle(OverlayEvent::Key("Escape")));
    assert!(!overlay.scroll_locked());

    overlay.open("https://img/2.png");
    assert!(overlay.handle(OverlayEvent::ClickOutside));
    overlay.open("https://img/3.png");
    assert_eq!(overlay.image_url(), Some("https://img/3.png"));
    assert!(overlay.handle(OverlayEvent::CloseButton));
    assert!(overlay.image_url().is_none());
}
