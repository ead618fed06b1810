use assert_matches::assert_matches;
use crux_core::{testing::AppTester, Request};
use shared::capabilities::{FetchError, FetchOperation, FetchOutput, FetchResult};
use shared::feed::{FeedKind, HOME_PAGE_SIZE, HOME_SEED_SIZE, RELATED_PAGE_SIZE, SIMULATED_LATENCY_MS};
use shared::generator::ItemId;
use shared::navigation::NavigationState;
use shared::scroll::LayoutSnapshot;
use shared::{App, Effect, Event, Model, ScreenView};

type Tester = AppTester<App, Effect>;

fn fetches(effects: Vec<Effect>) -> Vec<Request<FetchOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Fetch(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn single_fetch(effects: Vec<Effect>) -> Request<FetchOperation> {
    let mut requests = fetches(effects);
    assert_eq!(requests.len(), 1, "expected exactly one fetch");
    requests.remove(0)
}

fn resolve(app: &Tester, model: &mut Model, mut request: Request<FetchOperation>, result: FetchResult) {
    let update = app.resolve(&mut request, result).expect("fetch should resolve");
    for event in update.events {
        app.update(event, model);
    }
}

fn started() -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    let request = single_fetch(update.effects);
    resolve(&app, &mut model, request, Ok(FetchOutput::PageReady));

    (app, model)
}

fn scroll_home_to_end(app: &Tester, model: &mut Model) -> Vec<Effect> {
    let total = model.home.feed.len();
    app.update(
        Event::FeedScrolled {
            feed: FeedKind::Home,
            snapshot: LayoutSnapshot::new(total, total - 1),
        },
        model,
    )
    .effects
}

#[test]
fn app_start_seeds_the_home_feed() {
    let app = Tester::default();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));
    let request = single_fetch(update.effects);
    assert_matches!(
        &request.operation,
        FetchOperation::Page { request }
            if request.count == HOME_SEED_SIZE
                && request.start_id == ItemId(0)
                && request.delay_ms == SIMULATED_LATENCY_MS
    );
    assert!(app.view(&model).home.is_loading_more);

    resolve(&app, &mut model, request, Ok(FetchOutput::PageReady));

    let view = app.view(&model);
    assert_eq!(view.home.items.len(), HOME_SEED_SIZE);
    assert!(!view.home.is_loading_more);
    assert_eq!(view.home.items[3].caption.as_deref(), Some("Aesthetic Inspiration #3"));
}

#[test]
fn restarting_does_not_reseed() {
    let (app, mut model) = started();
    let update = app.update(Event::AppStarted, &mut model);
    assert!(fetches(update.effects).is_empty());
    assert_eq!(model.home.feed.len(), HOME_SEED_SIZE);
}

#[test]
fn near_end_scroll_fetches_one_page() {
    let (app, mut model) = started();

    let request = single_fetch(scroll_home_to_end(&app, &mut model));

    // Still near the end, and a fetch is in flight.
    assert!(fetches(scroll_home_to_end(&app, &mut model)).is_empty());
    let retry = app.update(Event::LoadMoreRequested { feed: FeedKind::Home }, &mut model);
    assert!(fetches(retry.effects).is_empty());

    resolve(&app, &mut model, request, Ok(FetchOutput::PageReady));
    assert_eq!(model.home.feed.len(), HOME_SEED_SIZE + HOME_PAGE_SIZE);
}

#[test]
fn back_to_back_requests_grow_by_one_page() {
    let (app, mut model) = started();
    assert_eq!(model.home.feed.len(), 40);

    let first = app.update(Event::LoadMoreRequested { feed: FeedKind::Home }, &mut model);
    let second = app.update(Event::LoadMoreRequested { feed: FeedKind::Home }, &mut model);

    let request = single_fetch(first.effects);
    assert!(fetches(second.effects).is_empty());

    resolve(&app, &mut model, request, Ok(FetchOutput::PageReady));
    assert_eq!(model.home.feed.len(), 40 + HOME_PAGE_SIZE);

    let ids: Vec<u64> = model.home.feed.items().iter().map(|i| i.id.value()).collect();
    assert_eq!(ids, (0..60).collect::<Vec<_>>());
}

#[test]
fn far_from_end_scroll_does_nothing() {
    let (app, mut model) = started();
    let update = app.update(
        Event::FeedScrolled {
            feed: FeedKind::Home,
            snapshot: LayoutSnapshot::new(40, 10),
        },
        &mut model,
    );
    assert!(fetches(update.effects).is_empty());
    assert!(!model.home.feed.is_loading_more());
}

#[test]
fn select_then_back_leaves_the_feed_unchanged() {
    let (app, mut model) = started();
    let before = model.home.feed.items().to_vec();

    let update = app.update(
        Event::ItemSelected {
            feed: FeedKind::Home,
            id: ItemId(5),
        },
        &mut model,
    );
    let related = single_fetch(update.effects);
    assert_matches!(&related.operation, FetchOperation::Page { request } if request.feed == FeedKind::Related);

    let view = app.view(&model);
    assert!(view.intercept_back);
    assert_matches!(view.screen, ScreenView::Detail { ref detail, .. } if detail.pin.id == ItemId(5));

    app.update(Event::BackPressed, &mut model);
    assert_eq!(model.navigation, NavigationState::List);
    assert_eq!(model.home.feed.items(), before.as_slice());
    assert!(!app.view(&model).intercept_back);
}

#[test]
fn detail_seeds_related_pins() {
    let (app, mut model) = started();
    let update = app.update(
        Event::ItemSelected {
            feed: FeedKind::Home,
            id: ItemId(1),
        },
        &mut model,
    );
    resolve(&app, &mut model, single_fetch(update.effects), Ok(FetchOutput::PageReady));

    let view = app.view(&model);
    let ScreenView::Detail { related, detail } = view.screen else {
        panic!("expected detail screen");
    };
    assert_eq!(related.items.len(), RELATED_PAGE_SIZE);
    assert!(related.items[0].image_url.contains("/seed/pintera_more_0/"));
    assert_eq!(detail.like_count_label, "1.2k");
    assert_eq!(detail.comment_count_label, "342");
}

#[test]
fn selecting_a_related_pin_replaces_the_detail() {
    let (app, mut model) = started();
    let update = app.update(
        Event::ItemSelected {
            feed: FeedKind::Home,
            id: ItemId(1),
        },
        &mut model,
    );
    resolve(&app, &mut model, single_fetch(update.effects), Ok(FetchOutput::PageReady));
    let related_ref = model.related.feed.items()[2].image_ref.clone();

    app.update(
        Event::ItemSelected {
            feed: FeedKind::Related,
            id: ItemId(2),
        },
        &mut model,
    );
    assert_eq!(
        model.navigation.selected().map(|item| item.image_ref.clone()),
        Some(related_ref)
    );

    // One back press returns to the list.
    app.update(Event::BackPressed, &mut model);
    assert!(!model.navigation.is_detail());
}

#[test]
fn late_related_page_is_discarded_after_back() {
    let (app, mut model) = started();
    let update = app.update(
        Event::ItemSelected {
            feed: FeedKind::Home,
            id: ItemId(7),
        },
        &mut model,
    );
    let stale = single_fetch(update.effects);

    app.update(Event::BackPressed, &mut model);
    resolve(&app, &mut model, stale, Ok(FetchOutput::PageReady));

    assert!(model.related.feed.is_empty());
    assert!(!model.related.feed.is_loading_more());
}

#[test]
fn late_home_page_still_appends_in_detail() {
    let (app, mut model) = started();
    let home = single_fetch(scroll_home_to_end(&app, &mut model));

    app.update(
        Event::ItemSelected {
            feed: FeedKind::Home,
            id: ItemId(0),
        },
        &mut model,
    );
    resolve(&app, &mut model, home, Ok(FetchOutput::PageReady));

    assert_eq!(model.home.feed.len(), HOME_SEED_SIZE + HOME_PAGE_SIZE);
    assert!(model.navigation.is_detail());
}

#[test]
fn failed_fetch_shows_a_retry_banner() {
    let (app, mut model) = started();
    let request = single_fetch(scroll_home_to_end(&app, &mut model));

    resolve(&app, &mut model, request, Err(FetchError::Timeout));

    let view = app.view(&model);
    assert_eq!(view.home.items.len(), HOME_SEED_SIZE);
    assert!(!view.home.is_loading_more);
    assert!(view.home.retryable);
    assert_eq!(
        view.home.error.as_deref(),
        Some("The request timed out. Please try again.")
    );

    let retry = app.update(Event::LoadMoreRequested { feed: FeedKind::Home }, &mut model);
    let request = single_fetch(retry.effects);
    assert_matches!(&request.operation, FetchOperation::Page { request } if request.start_id == ItemId(40));
    assert!(app.view(&model).home.error.is_none());
}

#[test]
fn unknown_item_is_ignored() {
    let (app, mut model) = started();
    let update = app.update(
        Event::ItemSelected {
            feed: FeedKind::Home,
            id: ItemId(999),
        },
        &mut model,
    );
    assert!(fetches(update.effects).is_empty());
    assert_eq!(model.navigation, NavigationState::List);
}

#[test]
fn related_events_without_detail_are_ignored() {
    let (app, mut model) = started();
    let update = app.update(Event::LoadMoreRequested { feed: FeedKind::Related }, &mut model);
    assert!(fetches(update.effects).is_empty());
    assert!(model.related.feed.is_empty());
}

#[test]
fn switching_destination_keeps_feed_state() {
    let (app, mut model) = started();
    app.update(
        Event::DestinationSelected {
            destination: shared::model::Destination::Profile,
        },
        &mut model,
    );
    app.update(
        Event::DestinationSelected {
            destination: shared::model::Destination::Home,
        },
        &mut model,
    );
    assert_eq!(model.home.feed.len(), HOME_SEED_SIZE);
}
