//! Shadow Arcade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use shadow_arcade::audio::{AudioManager, SoundEffect};
    use shadow_arcade::consts::*;
    use shadow_arcade::render::canvas;
    use shadow_arcade::sim::clock::FrameClock;
    use shadow_arcade::sim::events::GameEvent;
    use shadow_arcade::sim::{battle, cosmic, gravity, platformer, racer, strike};
    use shadow_arcade::{GameMode, HighScores, Settings, advice};

    /// One running minigame and its input state
    enum Session {
        Strike(strike::StrikeState, strike::StrikeInput),
        Battle(battle::BattleState, battle::BattleInput),
        Cosmic(cosmic::CosmicState, cosmic::CosmicInput),
        Racer(racer::RacerState, racer::RacerInput),
        Gravity(gravity::GravityState, gravity::GravityInput),
        Platformer(platformer::PlatformerState, platformer::PlatformerInput),
    }

    impl Session {
        fn new(mode: GameMode, seed: u64, viewport: Vec2) -> Self {
            match mode {
                GameMode::Strike => Session::Strike(
                    strike::StrikeState::new(seed, viewport),
                    strike::StrikeInput::default(),
                ),
                GameMode::Battle => Session::Battle(
                    battle::BattleState::new(seed),
                    battle::BattleInput::default(),
                ),
                GameMode::Cosmic => Session::Cosmic(
                    cosmic::CosmicState::new(seed, viewport),
                    cosmic::CosmicInput::default(),
                ),
                GameMode::Racer => Session::Racer(
                    racer::RacerState::new(seed, viewport),
                    racer::RacerInput::default(),
                ),
                GameMode::Gravity => Session::Gravity(
                    gravity::GravityState::new(seed, viewport),
                    gravity::GravityInput::default(),
                ),
                GameMode::Platformer => Session::Platformer(
                    platformer::PlatformerState::new(seed, viewport),
                    platformer::PlatformerInput::default(),
                ),
            }
        }

        /// Advance one fixed step and drain the frame's events
        fn tick(&mut self) -> Vec<GameEvent> {
            match self {
                Session::Strike(state, input) => {
                    strike::tick(state, input, SIM_DT);
                    state.drain_events()
                }
                Session::Battle(state, input) => {
                    battle::tick(state, input, SIM_DT);
                    state.drain_events()
                }
                Session::Cosmic(state, input) => {
                    cosmic::tick(state, input, SIM_DT);
                    state.drain_events()
                }
                Session::Racer(state, input) => {
                    racer::tick(state, input, SIM_DT);
                    state.drain_events()
                }
                Session::Gravity(state, input) => {
                    gravity::tick(state, input, SIM_DT);
                    state.drain_events()
                }
                Session::Platformer(state, input) => {
                    platformer::tick(state, input, SIM_DT);
                    state.drain_events()
                }
            }
        }

        /// Clear inputs that fire once per press
        fn clear_one_shot(&mut self) {
            match self {
                Session::Strike(_, input) => {
                    input.dodge = None;
                    input.switch_weapon = false;
                }
                Session::Battle(_, input) => input.switch_weapon = false,
                Session::Gravity(_, input) => input.flip = false,
                _ => {}
            }
        }

        fn render(&self, ctx: &CanvasRenderingContext2d, viewport: Vec2) {
            match self {
                Session::Strike(state, _) => canvas::draw_strike(ctx, state),
                Session::Battle(state, _) => canvas::draw_battle(ctx, state, viewport),
                Session::Cosmic(state, _) => canvas::draw_cosmic(ctx, state),
                Session::Racer(state, _) => canvas::draw_racer(ctx, state),
                Session::Gravity(state, _) => canvas::draw_gravity(ctx, state),
                Session::Platformer(state, _) => canvas::draw_platformer(ctx, state),
            }
        }

        fn score(&self) -> u64 {
            match self {
                Session::Strike(state, _) => state.board.score(),
                Session::Battle(state, _) => state.board.score(),
                Session::Cosmic(state, _) => state.board.score(),
                Session::Racer(state, _) => state.board.score(),
                Session::Gravity(state, _) => state.board.score(),
                Session::Platformer(state, _) => state.board.score(),
            }
        }

        fn is_over(&self) -> bool {
            match self {
                Session::Strike(state, _) => state.board.is_over(),
                Session::Battle(state, _) => state.board.is_over(),
                Session::Cosmic(state, _) => state.board.is_over(),
                Session::Racer(state, _) => state.board.is_over(),
                Session::Gravity(state, _) => state.board.is_over(),
                Session::Platformer(state, _) => state.board.is_over(),
            }
        }

        /// Queue-applied viewport change (between simulation steps only)
        fn set_bounds(&mut self, viewport: Vec2) {
            match self {
                Session::Strike(state, _) => state.set_bounds(viewport),
                Session::Battle(_, _) => {}
                Session::Cosmic(state, _) => state.set_bounds(viewport),
                Session::Racer(state, _) => state.set_bounds(viewport),
                Session::Gravity(state, _) => state.set_bounds(viewport),
                Session::Platformer(state, _) => state.set_bounds(viewport),
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        mode: GameMode,
        session: Session,
        clock: FrameClock,
        audio: AudioManager,
        highscores: HighScores,
        settings: Settings,
        viewport: Vec2,
        pending_resize: Option<Vec2>,
        paused: bool,
        /// Set once the final score has been reported; stops rescheduling
        finished: bool,
        /// Liveness flag checked by every stale callback
        running: bool,
        // Joystick bookkeeping (strike/battle left-half touch)
        joystick_start: Option<Vec2>,
        joystick_pos: Option<Vec2>,
        fire_touch: Option<i32>,
        fire_touch_start: Option<(Vec2, f64)>,
    }

    impl Game {
        fn new(mode: GameMode, seed: u64, viewport: Vec2) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                mode,
                session: Session::new(mode, seed, viewport),
                clock: FrameClock::new(),
                audio,
                highscores: HighScores::load(),
                settings,
                viewport,
                pending_resize: None,
                paused: false,
                finished: false,
                running: true,
                joystick_start: None,
                joystick_pos: None,
                fire_touch: None,
                fire_touch_start: None,
            }
        }

        /// Run simulation ticks for one animation frame
        fn update(&mut self, now_ms: f64) -> Vec<GameEvent> {
            // Resize applies between steps, never mid-step
            if let Some(viewport) = self.pending_resize.take() {
                self.viewport = viewport;
                self.session.set_bounds(viewport);
            }
            if self.paused {
                self.clock.reset();
                return Vec::new();
            }

            let steps = self.clock.advance(now_ms / 1000.0);
            let mut events = Vec::new();
            for _ in 0..steps {
                events.extend(self.session.tick());
                self.session.clear_one_shot();
                if self.session.is_over() {
                    break;
                }
            }
            events
        }

        /// Report the final score exactly once: high score write, tip
        /// request, overlay update.
        fn report_game_over(&mut self, final_score: u64) {
            if self.finished {
                return;
            }
            self.finished = true;

            let improved = self.highscores.submit(self.mode, final_score);
            if improved {
                self.highscores.save();
                self.audio.play(SoundEffect::HighScore);
            }
            log::info!(
                "Game over: mode={:?} score={} (best={})",
                self.mode,
                final_score,
                self.highscores.read(self.mode)
            );

            let document = web_sys::window().and_then(|w| w.document());
            if let Some(document) = document {
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.set_attribute("class", "");
                }
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&final_score.to_string()));
                }
            }

            // Flavor text arrives whenever it arrives; the fallback is
            // already on screen if the fetch loses the race or fails.
            set_tip_text(advice::fallback_tip(final_score));
            advice::request_tip(final_score, |tip| set_tip_text(&tip));
        }

        fn render(&self) {
            let Some(ctx) = canvas_context() else {
                // Surface unavailable: skip this frame's render only
                return;
            };
            self.session.render(&ctx, self.viewport);
        }

        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.session.score().to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                el.set_text_content(Some(&self.highscores.read(self.mode).to_string()));
            }
        }
    }

    fn set_tip_text(tip: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id("tip") {
                el.set_text_content(Some(tip));
            }
        }
    }

    fn canvas_element() -> Option<HtmlCanvasElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id("canvas")?
            .dyn_into()
            .ok()
    }

    fn canvas_context() -> Option<CanvasRenderingContext2d> {
        canvas_element()?
            .get_context("2d")
            .ok()??
            .dyn_into()
            .ok()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Shadow Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas = canvas_element().expect("no canvas");
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let viewport = Vec2::new(width as f32, height as f32);

        let mode = mode_from_location().unwrap_or(GameMode::Strike);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(mode, seed, viewport)));
        log::info!("Mode {:?}, seed {}", mode, seed);

        // Lobby daily-bonus line (cosmetic; fallback shown until it lands)
        if let Some(el) = document.get_element_by_id("daily") {
            el.set_text_content(Some(advice::FALLBACK_DAILY));
            advice::request_daily(move |line| {
                el.set_text_content(Some(&line));
            });
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Shadow Arcade running!");
    }

    /// Mode from the `?mode=` query parameter, picked by the lobby page
    fn mode_from_location() -> Option<GameMode> {
        let search = web_sys::window()?.location().search().ok()?;
        let query = search.strip_prefix('?')?;
        let value = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("mode="))?;
        GameMode::ALL
            .into_iter()
            .find(|m| m.storage_key() == value)
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let reschedule = {
            let mut g = game.borrow_mut();
            if !g.running {
                // Torn down: drop the callback chain entirely
                false
            } else {
                let events = g.update(time);

                let mut final_score = None;
                for event in &events {
                    if let GameEvent::GameOver { score } = event {
                        final_score = Some(*score);
                    }
                }
                g.audio.play_events(&events);
                if let Some(score) = final_score {
                    g.report_game_over(score);
                }

                g.render();
                g.update_hud();
                !g.finished
            }
        };

        if reschedule {
            request_animation_frame(game);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !g.running {
                    return;
                }
                g.audio.resume();
                let vw = g.viewport.x;
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let viewport = g.viewport;
                    match &mut g.session {
                        Session::Strike(_, input) => {
                            if pos.x < vw / 2.0 {
                                g.joystick_start = Some(pos);
                                g.joystick_pos = Some(pos);
                            } else {
                                input.fire = true;
                                g.fire_touch = Some(touch.identifier());
                                g.fire_touch_start = Some((pos, js_sys::Date::now()));
                            }
                        }
                        Session::Battle(_, input) => {
                            if pos.x < vw / 2.0 {
                                g.joystick_start = Some(pos);
                                g.joystick_pos = Some(pos);
                            } else {
                                input.fire = true;
                                input.aim = Some(
                                    (pos.y - viewport.y / 2.0).atan2(pos.x - viewport.x / 2.0),
                                );
                            }
                        }
                        Session::Cosmic(_, input) => input.pointer_x = Some(pos.x),
                        Session::Racer(_, input) => input.steer_x = Some(pos.x),
                        Session::Gravity(_, input) => input.flip = true,
                        Session::Platformer(_, input) => {
                            if pos.x < vw / 3.0 {
                                input.left = true;
                            } else if pos.x < vw * 2.0 / 3.0 {
                                input.right = true;
                            } else {
                                input.jump = true;
                            }
                        }
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !g.running {
                    return;
                }
                let vw = g.viewport.x;
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let fire_touch = g.fire_touch;
                    let viewport = g.viewport;
                    match &mut g.session {
                        Session::Strike(state, input) => {
                            if g.joystick_start.is_some() && pos.x < vw / 2.0 {
                                g.joystick_pos = Some(pos);
                            }
                            if fire_touch == Some(touch.identifier()) {
                                let player = state.player.pos;
                                input.aim =
                                    Some((pos.y - player.y).atan2(pos.x - player.x));
                            }
                        }
                        Session::Battle(_, input) => {
                            if g.joystick_start.is_some() && pos.x < vw / 2.0 {
                                g.joystick_pos = Some(pos);
                            } else if pos.x >= vw / 2.0 {
                                input.aim = Some(
                                    (pos.y - viewport.y / 2.0).atan2(pos.x - viewport.x / 2.0),
                                );
                            }
                        }
                        Session::Cosmic(_, input) => input.pointer_x = Some(pos.x),
                        Session::Racer(_, input) => input.steer_x = Some(pos.x),
                        _ => {}
                    }
                }
                // Feed the joystick vector into the movement input
                if let (Some(start), Some(cur)) = (g.joystick_start, g.joystick_pos) {
                    let delta = cur - start;
                    match &mut g.session {
                        Session::Strike(_, input) => input.move_dir = Some(delta),
                        Session::Battle(_, input) => input.move_dir = Some(delta),
                        _ => {}
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !g.running {
                    return;
                }
                let vw = g.viewport.x;
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    if pos.x < vw / 2.0 {
                        g.joystick_start = None;
                        g.joystick_pos = None;
                        match &mut g.session {
                            Session::Strike(_, input) => input.move_dir = None,
                            Session::Battle(_, input) => input.move_dir = None,
                            _ => {}
                        }
                    }
                    if g.fire_touch == Some(touch.identifier()) {
                        g.fire_touch = None;
                        let swipe = g.fire_touch_start.take().and_then(|(start, at)| {
                            let delta = pos - start;
                            let quick = js_sys::Date::now() - at < 250.0;
                            (quick && delta.length() > 40.0).then_some(delta)
                        });
                        match &mut g.session {
                            Session::Strike(_, input) => {
                                input.fire = false;
                                if swipe.is_some() {
                                    input.dodge = swipe;
                                }
                            }
                            Session::Battle(_, input) => input.fire = false,
                            _ => {}
                        }
                    }
                    match &mut g.session {
                        Session::Platformer(_, input) => {
                            input.left = false;
                            input.right = false;
                            input.jump = false;
                        }
                        _ => {}
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse (desktop testing): move aims/steers, press fires
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !g.running {
                    return;
                }
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let viewport = g.viewport;
                match &mut g.session {
                    Session::Strike(state, input) => {
                        let player = state.player.pos;
                        input.aim = Some((pos.y - player.y).atan2(pos.x - player.x));
                    }
                    Session::Battle(_, input) => {
                        input.aim =
                            Some((pos.y - viewport.y / 2.0).atan2(pos.x - viewport.x / 2.0));
                    }
                    Session::Cosmic(_, input) => input.pointer_x = Some(pos.x),
                    Session::Racer(_, input) => input.steer_x = Some(pos.x),
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !g.running {
                    return;
                }
                g.audio.resume();
                match &mut g.session {
                    Session::Strike(_, input) => input.fire = true,
                    Session::Battle(_, input) => input.fire = true,
                    Session::Gravity(_, input) => input.flip = true,
                    Session::Platformer(_, input) => input.jump = true,
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                match &mut g.session {
                    Session::Strike(_, input) => input.fire = false,
                    Session::Battle(_, input) => input.fire = false,
                    Session::Platformer(_, input) => input.jump = false,
                    _ => {}
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !g.running {
                    return;
                }
                let key = event.key();
                let down_dir = match key.as_str() {
                    "ArrowUp" | "w" => Some(Vec2::new(0.0, -100.0)),
                    "ArrowDown" | "s" => Some(Vec2::new(0.0, 100.0)),
                    "ArrowLeft" | "a" => Some(Vec2::new(-100.0, 0.0)),
                    "ArrowRight" | "d" => Some(Vec2::new(100.0, 0.0)),
                    _ => None,
                };
                match &mut g.session {
                    Session::Strike(_, input) => match key.as_str() {
                        " " => input.fire = true,
                        "q" | "Q" => input.switch_weapon = true,
                        "Shift" => input.dodge = input.move_dir,
                        _ => {
                            if down_dir.is_some() {
                                input.move_dir = down_dir;
                            }
                        }
                    },
                    Session::Battle(_, input) => match key.as_str() {
                        " " => input.fire = true,
                        "q" | "Q" => input.switch_weapon = true,
                        _ => {
                            if down_dir.is_some() {
                                input.move_dir = down_dir;
                            }
                        }
                    },
                    Session::Gravity(_, input) => {
                        if key == " " {
                            input.flip = true;
                        }
                    }
                    Session::Platformer(_, input) => match key.as_str() {
                        "ArrowLeft" | "a" => input.left = true,
                        "ArrowRight" | "d" => input.right = true,
                        " " | "ArrowUp" | "w" => input.jump = true,
                        _ => {}
                    },
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                let key = event.key();
                match &mut g.session {
                    Session::Strike(_, input) => match key.as_str() {
                        " " => input.fire = false,
                        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "w" | "a" | "s"
                        | "d" => input.move_dir = None,
                        _ => {}
                    },
                    Session::Battle(_, input) => match key.as_str() {
                        " " => input.fire = false,
                        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "w" | "a" | "s"
                        | "d" => input.move_dir = None,
                        _ => {}
                    },
                    Session::Platformer(_, input) => match key.as_str() {
                        "ArrowLeft" | "a" => input.left = false,
                        "ArrowRight" | "d" => input.right = false,
                        " " | "ArrowUp" | "w" => input.jump = false,
                        _ => {}
                    },
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                let mode = g.mode;
                let viewport = g.viewport;
                g.session = Session::new(mode, seed, viewport);
                g.clock.reset();
                g.paused = false;
                let was_finished = g.finished;
                g.finished = false;
                let document = web_sys::window().and_then(|w| w.document());
                if let Some(document) = document {
                    if let Some(el) = document.get_element_by_id("game-over") {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
                log::info!("Restarted with seed {}", seed);
                // The loop stopped at game-over; kick it off again
                if was_finished {
                    drop(g);
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden =
                    document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                if hidden && !g.finished {
                    g.paused = true;
                    if g.settings.mute_on_blur {
                        g.audio.set_muted(true);
                    }
                    log::info!("Auto-paused (tab hidden)");
                } else if !hidden {
                    g.paused = false;
                    g.audio.set_muted(false);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur/focus
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if !g.finished {
                    g.paused = true;
                    if g.settings.mute_on_blur {
                        g.audio.set_muted(true);
                    }
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.paused = false;
                g.audio.set_muted(false);
            });
            let _ = web_sys::window()
                .expect("no window")
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(canvas) = canvas_element() else {
                return;
            };
            let width = canvas.client_width().max(1) as u32;
            let height = canvas.client_height().max(1) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            // Queued; applied before the next simulation step begins
            game.borrow_mut().pending_resize =
                Some(Vec2::new(width as f32, height as f32));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main; this only satisfies the bin target
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use shadow_arcade::consts::SIM_DT;
    use shadow_arcade::sim::{battle, cosmic, gravity, platformer, racer, strike};

    env_logger::init();
    log::info!("Shadow Arcade (native) - running headless demo sims");

    let viewport = Vec2::new(800.0, 600.0);
    let seed = 0xC0FFEE;
    let ticks = 60 * 30; // 30 seconds each

    {
        let mut state = strike::StrikeState::new(seed, viewport);
        let input = strike::StrikeInput {
            fire: true,
            move_dir: Some(Vec2::new(40.0, 25.0)),
            ..Default::default()
        };
        for _ in 0..ticks {
            strike::tick(&mut state, &input, SIM_DT);
            state.drain_events();
            if state.board.is_over() {
                break;
            }
        }
        println!(
            "STRIKE     score={:<6} level={} ticks={}",
            state.board.score(),
            state.board.level(),
            state.time_ticks
        );
    }
    {
        let mut state = battle::BattleState::new(seed);
        let input = battle::BattleInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..ticks {
            battle::tick(&mut state, &input, SIM_DT);
            state.drain_events();
            if state.board.is_over() {
                break;
            }
        }
        println!(
            "BATTLE     score={:<6} kills={} alive={}",
            state.board.score(),
            state.kills,
            state.alive_count()
        );
    }
    {
        let mut state = cosmic::CosmicState::new(seed, viewport);
        let input = cosmic::CosmicInput::default();
        for _ in 0..ticks {
            cosmic::tick(&mut state, &input, SIM_DT);
            state.drain_events();
            if state.board.is_over() {
                break;
            }
        }
        println!(
            "COSMIC     score={:<6} ticks={}",
            state.board.score(),
            state.time_ticks
        );
    }
    {
        let mut state = racer::RacerState::new(seed, viewport);
        let input = racer::RacerInput::default();
        for _ in 0..ticks {
            racer::tick(&mut state, &input, SIM_DT);
            state.drain_events();
            if state.board.is_over() {
                break;
            }
        }
        println!(
            "RACER      score={:<6} hull={}",
            state.board.score(),
            state.health
        );
    }
    {
        let mut state = gravity::GravityState::new(seed, viewport);
        let mut input = gravity::GravityInput::default();
        for i in 0..ticks {
            // Flip every second to hover mid-corridor
            input.flip = i % 60 == 0;
            gravity::tick(&mut state, &input, SIM_DT);
            state.drain_events();
            if state.board.is_over() {
                break;
            }
        }
        println!(
            "GRAVITY    score={:<6} speed={:.0}",
            state.board.score(),
            state.scroll_speed
        );
    }
    {
        let mut state = platformer::PlatformerState::new(seed, viewport);
        let input = platformer::PlatformerInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        for _ in 0..ticks {
            platformer::tick(&mut state, &input, SIM_DT);
            state.drain_events();
            if state.board.is_over() {
                break;
            }
        }
        println!(
            "PLATFORMER score={:<6} x={:.0}",
            state.board.score(),
            state.player.pos.x
        );
    }
}
