//! Lucky House entry point
//!
//! Handles platform-specific initialization and runs the web shell: the
//! catch-game canvas loop, the puzzle board, the setup prompt, and the
//! blessing card with its share link.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement, MouseEvent,
        TouchEvent, UrlSearchParams,
    };

    use lucky_house::blessing::{self, BlessingCard};
    use lucky_house::sim::{
        CatchSession, ItemKind, MoveOutcome, PUZZLE_IMAGES, PuzzleBoard, SessionPhase, Viewport,
    };
    use lucky_house::{Profile, Relationship, ThemeKey};

    /// Pixel size of the square puzzle canvas
    const PUZZLE_CANVAS_SIZE: f64 = 320.0;

    /// Query keys the house reads off a share link
    const SHARE_KEYS: [&str; 6] = ["u", "f", "r", "to", "from", "msg"];

    /// Shell state for the whole house
    struct App {
        profile: Profile,
        session: CatchSession,
        puzzle: PuzzleBoard,
        card: BlessingCard,
        canvas: HtmlCanvasElement,
        puzzle_canvas: Option<HtmlCanvasElement>,
        /// Interval handle for the 1 Hz countdown; must be cleared whenever
        /// the session ends so no orphaned callback keeps ticking
        countdown_handle: Option<i32>,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lucky House starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Share-link fields override the stored record, which overrides defaults
        let mut profile = Profile::load();
        let link_pairs = location_query_pairs(&window);
        profile.apply_query_pairs(link_pairs.clone());
        profile.save();

        let card = BlessingCard::from_query_pairs(link_pairs, &profile);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("catch-canvas")
            .expect("no catch canvas")
            .dyn_into()
            .expect("not a canvas");
        size_canvas_to_window(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            session: CatchSession::new(seed),
            puzzle: PuzzleBoard::shuffled(3, seed),
            card,
            profile,
            canvas,
            puzzle_canvas: document
                .get_element_by_id("puzzle-canvas")
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok()),
            countdown_handle: None,
        }));

        {
            let a = app.borrow();
            sync_setup_prompt(&document, &a.profile);
            render_card(&document, &a.card);
            update_hub(&document, &a.profile);
            draw_puzzle(&a);
        }

        setup_resize(app.clone());
        setup_pointer_input(app.clone());
        setup_puzzle_input(app.clone());
        setup_buttons(app.clone());

        log::info!("Lucky House running with seed {seed}");
    }

    // === profile & share link ===

    /// Collect the known share keys from both the normal query string and a
    /// hash-route query (`#/blessing?to=...`), letting the browser do the
    /// percent-decoding.
    fn location_query_pairs(window: &web_sys::Window) -> Vec<(String, String)> {
        let location = window.location();
        let mut raw = String::new();
        if let Ok(search) = location.search() {
            raw.push_str(search.trim_start_matches('?'));
        }
        if let Ok(hash) = location.hash() {
            if let Some((_, query)) = hash.split_once('?') {
                if !raw.is_empty() {
                    raw.push('&');
                }
                raw.push_str(query);
            }
        }

        let mut pairs = Vec::new();
        if raw.is_empty() {
            return pairs;
        }
        if let Ok(params) = UrlSearchParams::new_with_str(&raw) {
            for key in SHARE_KEYS {
                if let Some(value) = params.get(key) {
                    pairs.push((key.to_string(), value));
                }
            }
        }
        pairs
    }

    fn build_share_url(card: &BlessingCard) -> Option<String> {
        let location = web_sys::window()?.location();
        let origin = location.origin().ok()?;
        let path = location.pathname().ok()?;
        let params = UrlSearchParams::new().ok()?;
        for (key, value) in card.to_query_pairs() {
            params.append(key, &value);
        }
        let query = String::from(params.to_string());
        Some(format!("{origin}{path}#/blessing?{query}"))
    }

    /// Blocking setup prompt: shown until both names are filled in
    fn sync_setup_prompt(document: &Document, profile: &Profile) {
        if profile.is_complete() {
            hide(document, "setup-prompt");
        } else {
            show(document, "setup-prompt");
        }
    }

    // === catch game ===

    fn start_catch_session(app: &Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let already_running = {
            let mut a = app.borrow_mut();
            // A leftover countdown from an earlier session must not keep ticking
            if let Some(handle) = a.countdown_handle.take() {
                window.clear_interval_with_handle(handle);
            }
            let running = a.session.phase == SessionPhase::Playing;
            a.session.start(now);
            running
        };

        if let Some(document) = window.document() {
            hide(&document, "catch-overlay");
        }

        start_countdown(app.clone());
        // An armed frame loop keeps itself alive while the phase is Playing;
        // arming a second one would double the fall speed
        if !already_running {
            request_frame(app.clone());
        }
    }

    fn start_countdown(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let app_for_tick = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let ended = {
                let mut a = app_for_tick.borrow_mut();
                let App {
                    session, profile, ..
                } = &mut *a;
                session.second_tick(&mut profile.scores)
            };
            update_catch_hud(&app_for_tick.borrow());
            if ended {
                end_catch_session(&app_for_tick);
            }
        });
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1000,
            )
            .ok();
        closure.forget();

        app.borrow_mut().countdown_handle = handle;
    }

    fn end_catch_session(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if let Some(handle) = a.countdown_handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
            a.profile.save();
        }

        let a = app.borrow();
        let window = web_sys::window().unwrap();
        if let Some(document) = window.document() {
            set_text(&document, "final-score", &a.session.score.to_string());
            show(&document, "catch-overlay");
            update_hub(&document, &a.profile);
        }
    }

    fn request_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        let playing = {
            let mut a = app.borrow_mut();
            let view = viewport(&a.canvas);
            a.session.frame(time, view);
            a.session.phase == SessionPhase::Playing
        };

        {
            let a = app.borrow();
            draw_catch(&a);
            update_catch_hud(&a);
        }

        // Re-arm only while a session runs; ending or abandoning the game
        // must not leave a callback mutating stale state
        if playing {
            request_frame(app);
        }
    }

    /// Dimensions are re-read from the canvas every frame so resizes take
    /// effect immediately
    fn viewport(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport {
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        }
    }

    fn draw_catch(app: &App) {
        // A missing or detached context just skips this frame's paint
        let Some(ctx) = context_2d(&app.canvas) else {
            return;
        };
        let theme = app.profile.theme.theme();
        let width = app.canvas.width() as f64;
        let height = app.canvas.height() as f64;

        ctx.clear_rect(0.0, 0.0, width, height);
        if app.session.phase != SessionPhase::Playing {
            return;
        }

        // Basket
        let basket_w = 80.0;
        let basket_h = 50.0;
        let player_x = app.session.player_x as f64;
        ctx.set_fill_style_str(theme.primary);
        ctx.fill_rect(
            player_x - basket_w / 2.0,
            height - basket_h - 20.0,
            basket_w,
            basket_h,
        );
        ctx.set_font("30px Arial");
        ctx.set_text_align("center");
        let _ = ctx.fill_text("🧺", player_x, height - 35.0);

        // Items
        ctx.set_font("32px Arial");
        for item in &app.session.items {
            let emoji = match item.kind {
                ItemKind::RedPacket => "🧧",
                ItemKind::Coin => "💰",
                ItemKind::Orange => "🍊",
                ItemKind::Bomb => "💣",
            };
            let _ = ctx.fill_text(emoji, item.pos.x as f64, item.pos.y as f64);
        }
    }

    fn update_catch_hud(app: &App) {
        let window = web_sys::window().unwrap();
        let Some(document) = window.document() else {
            return;
        };
        set_text(&document, "hud-score", &app.session.score.to_string());
        set_text(&document, "hud-time", &format!("{}s", app.session.time_left));
    }

    fn setup_pointer_input(app: Rc<RefCell<App>>) {
        let canvas = app.borrow().canvas.clone();

        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .session
                    .set_player_x(event.offset_x() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Single-touch move
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    app.borrow_mut().session.set_player_x(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let a = app.borrow();
            size_canvas_to_window(&window_clone, &a.canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn size_canvas_to_window(window: &web_sys::Window, canvas: &HtmlCanvasElement) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(360.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(640.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }

    // === puzzle ===

    fn setup_puzzle_input(app: Rc<RefCell<App>>) {
        let Some(canvas) = app.borrow().puzzle_canvas.clone() else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let outcome = {
                let mut a = app.borrow_mut();
                let size = a.puzzle.size();
                let cell = PUZZLE_CANVAS_SIZE / size as f64;
                let col = ((event.offset_x() as f64 / cell) as usize).min(size - 1);
                let row = ((event.offset_y() as f64 / cell) as usize).min(size - 1);
                let index = row * size + col;

                let App {
                    puzzle, profile, ..
                } = &mut *a;
                puzzle.apply_move(index, &mut profile.scores)
            };

            let a = app.borrow();
            draw_puzzle(&a);
            if outcome == MoveOutcome::Solved {
                a.profile.save();
                let window = web_sys::window().unwrap();
                if let Some(document) = window.document() {
                    show(&document, "puzzle-done");
                    update_hub(&document, &a.profile);
                }
            }
            update_puzzle_hud(&a);
        });
        let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn reshuffle_puzzle(app: &Rc<RefCell<App>>, size: usize) {
        {
            let mut a = app.borrow_mut();
            let seed = js_sys::Date::now() as u64;
            a.puzzle = PuzzleBoard::shuffled(size, seed);
        }

        let a = app.borrow();
        let window = web_sys::window().unwrap();
        if let Some(document) = window.document() {
            hide(&document, "puzzle-done");
        }
        draw_puzzle(&a);
        update_puzzle_hud(&a);
    }

    fn draw_puzzle(app: &App) {
        let Some(canvas) = app.puzzle_canvas.as_ref() else {
            return;
        };
        let Some(ctx) = context_2d(canvas) else {
            return;
        };
        let theme = app.profile.theme.theme();
        let size = app.puzzle.size();
        let cell = PUZZLE_CANVAS_SIZE / size as f64;

        ctx.clear_rect(0.0, 0.0, PUZZLE_CANVAS_SIZE, PUZZLE_CANVAS_SIZE);
        ctx.set_text_align("center");
        ctx.set_font("24px Arial");

        for (index, &tile) in app.puzzle.tiles().iter().enumerate() {
            // The blank stays invisible until the picture is complete
            if tile == app.puzzle.blank_value() && !app.puzzle.is_solved() {
                continue;
            }
            let x = (index % size) as f64 * cell;
            let y = (index / size) as f64 * cell;
            ctx.set_fill_style_str(theme.primary);
            ctx.fill_rect(x + 1.0, y + 1.0, cell - 2.0, cell - 2.0);
            ctx.set_fill_style_str(theme.text);
            let _ = ctx.fill_text(&(tile + 1).to_string(), x + cell / 2.0, y + cell / 2.0 + 8.0);
        }
    }

    fn update_puzzle_hud(app: &App) {
        let window = web_sys::window().unwrap();
        let Some(document) = window.document() else {
            return;
        };
        set_text(&document, "puzzle-moves", &app.puzzle.moves().to_string());
    }

    // === hub, card, buttons ===

    fn update_hub(document: &Document, profile: &Profile) {
        set_text(document, "hub-best-catch", &profile.scores.catch_best.to_string());
        set_text(
            document,
            "hub-puzzle-status",
            if profile.scores.puzzle_solved {
                "Completed"
            } else {
                "Not yet"
            },
        );
        set_text(document, "hub-user", &profile.user_name);
        set_text(document, "hub-friend", &profile.friend_name);
        set_text(document, "hub-relationship", profile.relationship.as_str());
    }

    fn render_card(document: &Document, card: &BlessingCard) {
        set_text(document, "card-to", &card.to);
        set_text(document, "card-from", &card.from);
        set_text(document, "card-msg", &card.message);
        if card.received {
            show(document, "card-received-badge");
        } else {
            hide(document, "card-received-badge");
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start / retry the catch game
        {
            let app = app.clone();
            on_click(&document, "catch-start-btn", move || {
                start_catch_session(&app);
            });
        }

        // Reshuffle at the current size, and the three difficulty buttons
        {
            let app = app.clone();
            on_click(&document, "shuffle-btn", move || {
                let size = app.borrow().puzzle.size();
                reshuffle_puzzle(&app, size);
            });
        }
        for (id, size) in [("grid-2", 2usize), ("grid-3", 3), ("grid-4", 4)] {
            let app = app.clone();
            on_click(&document, id, move || {
                reshuffle_puzzle(&app, size);
            });
        }

        // Picking a different picture also re-shuffles at the current size
        for image in PUZZLE_IMAGES {
            let app = app.clone();
            let id = format!("img-{}", image.id);
            on_click(&document, &id, move || {
                log::info!("Puzzle picture: {}", image.name);
                let size = app.borrow().puzzle.size();
                reshuffle_puzzle(&app, size);
            });
        }

        // Theme switcher repaints everything theme-colored
        for key in ThemeKey::ALL {
            let app = app.clone();
            let id = format!("theme-{}", key.as_str());
            on_click(&document, &id, move || {
                let mut a = app.borrow_mut();
                a.profile.theme = key;
                a.profile.save();
                draw_puzzle(&a);
                draw_catch(&a);
            });
        }

        // Setup prompt: blocks until both names are present
        {
            let app = app.clone();
            on_click(&document, "setup-btn", move || {
                let window = web_sys::window().unwrap();
                let Some(document) = window.document() else {
                    return;
                };
                let user = input_value(&document, "input-user");
                let friend = input_value(&document, "input-friend");
                if user.is_empty() || friend.is_empty() {
                    show(&document, "setup-error");
                    return;
                }
                hide(&document, "setup-error");

                let mut a = app.borrow_mut();
                a.profile.user_name = user;
                a.profile.friend_name = friend;
                if let Some(rel) = Relationship::from_str(&input_value(&document, "input-rel")) {
                    a.profile.relationship = rel;
                }
                a.profile.save();
                if !a.card.received {
                    a.card = BlessingCard::from_profile(&a.profile);
                }

                // Mirror the identifying fields onto the URL so the house
                // itself is shareable
                if let Ok(params) = UrlSearchParams::new() {
                    for (key, value) in a.profile.to_query_pairs() {
                        params.append(key, &value);
                    }
                    let query = String::from(params.to_string());
                    let _ = window.location().set_hash(&format!("/home?{query}"));
                }

                sync_setup_prompt(&document, &a.profile);
                update_hub(&document, &a.profile);
                render_card(&document, &a.card);
            });
        }

        // Draw another canned blessing
        {
            let app = app.clone();
            on_click(&document, "draw-btn", move || {
                let mut rng = Pcg32::seed_from_u64(js_sys::Date::now() as u64);
                let mut a = app.borrow_mut();
                a.card.message = blessing::random_blessing(&mut rng).to_string();

                let window = web_sys::window().unwrap();
                if let Some(document) = window.document() {
                    render_card(&document, &a.card);
                }
            });
        }

        // Publish the share link for the current card
        on_click(&document, "share-btn", move || {
            let a = app.borrow();
            let window = web_sys::window().unwrap();
            let Some(document) = window.document() else {
                return;
            };
            if let Some(url) = build_share_url(&a.card) {
                set_text(&document, "share-url", &url);
                show(&document, "share-url");
                log::info!("Share link ready");
            }
        });
    }

    // === small DOM helpers ===

    fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
    }

    fn on_click<F: FnMut() + 'static>(document: &Document, id: &str, mut handler: F) {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn input_value(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value().trim().to_string())
            .unwrap_or_default()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", "hidden");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lucky House (native) starting...");
    log::info!("The house is a browser app - run with `trunk serve` for the web version");

    demo_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Blind smoke round: drives a full catch session against the simulated
/// clock so the native binary exercises the core without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() {
    use lucky_house::LuckScores;
    use lucky_house::consts::GAME_DURATION_SECS;
    use lucky_house::sim::{CatchSession, Viewport};

    let mut session = CatchSession::new(42);
    let mut scores = LuckScores::default();
    let view = Viewport {
        width: 390.0,
        height: 780.0,
    };

    session.start(0.0);
    let mut now = 0.0;
    for second in 0..GAME_DURATION_SECS {
        session.set_player_x((second * 37 % 390) as f32);
        for _ in 0..60 {
            now += 1000.0 / 60.0;
            session.frame(now, view);
        }
        session.second_tick(&mut scores);
    }

    println!("\nBlind demo round finished, best score {}", scores.catch_best);
}
