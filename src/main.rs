//! Typing Asteroids entry point
//!
//! On the web this wires the engine to the DOM, the keyboard, the Datamuse
//! word API and theme audio. Natively it runs a headless autoplay demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use typing_asteroids::audio::{self, AudioManager};
    use typing_asteroids::consts::*;
    use typing_asteroids::sim::{
        EngineConfig, GameEvent, GamePhase, MechanicsEngine, Scheduler, StatsSnapshot,
    };
    use typing_asteroids::words::datamuse::fetch_words;
    use typing_asteroids::Settings;

    /// Game instance holding all state
    struct Game {
        engine: MechanicsEngine,
        scheduler: Scheduler,
        settings: Settings,
        audio: AudioManager,
        last_time: f64,
        seconds_left: u32,
        /// Stats from the level that just ended, shown between levels
        level_stats: Option<StatsSnapshot>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let config = EngineConfig::default();
            Self {
                engine: MechanicsEngine::new(&config, seed),
                scheduler: Scheduler::new(&config),
                settings,
                audio: AudioManager::new(),
                last_time: 0.0,
                seconds_left: config.level_duration_secs,
                level_stats: None,
            }
        }

        /// Step clocks, then hand events to audio and the word fetcher
        fn update(game: &Rc<RefCell<Game>>, dt: f32, time: f64) {
            let events = {
                let mut g = game.borrow_mut();
                let Game {
                    engine, scheduler, ..
                } = &mut *g;
                let report = scheduler.update(engine, dt, time);
                g.seconds_left = report.seconds_left;
                if let Some(stats) = report.level_ended {
                    log::info!("Level stats: {} wpm, {} accuracy", stats.wpm, stats.accuracy);
                    g.level_stats = Some(stats);
                }
                g.engine.drain_events()
            };

            for event in events {
                match &event {
                    GameEvent::WordsRequested(request) => {
                        let request = *request;
                        let game = game.clone();
                        wasm_bindgen_futures::spawn_local(async move {
                            let result = fetch_words(request).await;
                            game.borrow_mut().engine.receive_words(request, result);
                        });
                    }
                    GameEvent::GameOver { score, .. } => {
                        log::info!("Final score: {}", score);
                        let mut g = game.borrow_mut();
                        let menu = audio::menu_music_cue(&g.settings);
                        g.audio.start_music(menu);
                    }
                    _ => {}
                }
                let g = game.borrow();
                g.audio.play_event(&event, &g.settings);
            }
        }

        /// Draw asteroids as positioned DOM nodes
        fn render(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(field) = document.get_element_by_id("playfield") else {
                return;
            };
            field.set_inner_html("");
            for asteroid in self.engine.asteroids() {
                let Ok(el) = document.create_element("div") else {
                    continue;
                };
                let typed = &asteroid.original_word
                    [..asteroid.original_word.len() - asteroid.remaining.len()];
                el.set_inner_html(&format!(
                    "<span class=\"typed\">{}</span>{}",
                    typed, asteroid.remaining
                ));
                let class = if asteroid.is_partially_typed() {
                    "asteroid locked"
                } else {
                    "asteroid"
                };
                let _ = el.set_attribute("class", class);
                let _ = el.set_attribute(
                    "style",
                    &format!("left:{}px;top:{}px", asteroid.pos.x, asteroid.pos.y),
                );
                let _ = field.append_child(&el);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set_text("#hud-score .hud-value", &self.engine.score().to_string());
            set_text("#hud-level .hud-value", &self.engine.level().level.to_string());
            set_text("#hud-timer .hud-value", &self.seconds_left.to_string());
            set_text(
                "#hud-multiplier .hud-value",
                &format!("x{}", self.engine.multiplier()),
            );
            if let Some(bar) = document.get_element_by_id("multiplier-progress") {
                let _ = bar.set_attribute(
                    "style",
                    &format!("width:{:.0}%", self.engine.combo_progress() * 100.0),
                );
            }

            let phase = self.engine.phase();
            let toggle = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            toggle("loading", phase == GamePhase::Initializing);
            toggle("pause-menu", phase == GamePhase::Paused);
            toggle("level-complete", phase == GamePhase::LevelTransition);
            toggle("game-over", phase == GamePhase::GameOver);

            if phase == GamePhase::LevelTransition {
                if let Some(stats) = &self.level_stats {
                    set_text("#level-wpm", &stats.wpm.to_string());
                    set_text("#level-accuracy", &stats.accuracy);
                    set_text("#level-words", &stats.words_completed.to_string());
                    set_text("#level-problem-chars", &stats.problem_chars_text());
                    set_text("#level-difficult-words", &stats.difficult_words_text());
                }
            }

            if phase == GamePhase::GameOver {
                set_text("#final-score", &self.engine.score().to_string());
                set_text("#final-level", &self.engine.level().level.to_string());
                let stats = self.engine.stats_snapshot(js_sys::Date::now());
                set_text("#final-wpm", &stats.wpm.to_string());
                set_text("#final-accuracy", &stats.accuracy);
                set_text("#final-problem-chars", &stats.problem_chars_text());
                set_text("#final-difficult-words", &stats.difficult_words_text());
            }
        }
    }

    /// Reset the engine and fetch the first word pool
    fn start_game(game: Rc<RefCell<Game>>) {
        let request = {
            let mut g = game.borrow_mut();
            let mode = g.settings.word_mode();
            let length = g.settings.initial_word_length;
            let request = g.engine.begin_init(mode, length, js_sys::Date::now());
            g.scheduler.reset();
            g.level_stats = None;
            request
        };

        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_words(request).await;
            let mut g = game.borrow_mut();
            g.engine.finish_init(result);
            if let Some(cue) = audio::start_cue(&g.settings) {
                g.audio.play(&cue);
            }
            let music = audio::music_cue(&g.settings);
            g.audio.start_music(music);
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Typing Asteroids starting...");

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        // Write back the sanitized copy so bad stored values do not linger
        settings.save();
        log::info!("Theme: {}", settings.theme.as_str());
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        start_game(game.clone());
        request_animation_frame(game);

        log::info!("Typing Asteroids running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.repeat() {
                return;
            }
            let key = event.key();
            let phase = game.borrow().engine.phase();
            match (phase, key.as_str()) {
                (GamePhase::GameOver, "Enter") => start_game(game.clone()),
                (_, "Escape") => {
                    let mut g = game.borrow_mut();
                    let Game {
                        engine,
                        scheduler,
                        audio,
                        ..
                    } = &mut *g;
                    match scheduler.toggle_pause(engine) {
                        Some(true) => audio.pause_music(),
                        Some(false) => audio.resume_music(),
                        None => {}
                    }
                }
                (GamePhase::Playing, _) => {
                    if key.chars().count() == 1 {
                        event.prevent_default();
                    }
                    game.borrow_mut().engine.handle_keystroke(&key);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let dt = {
            let mut g = game.borrow_mut();
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;
            dt
        };

        Game::update(&game, dt, js_sys::Date::now());
        {
            let g = game.borrow();
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_game(game.clone());
                log::info!("Started new game");
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

        let pause = {
            let game = game.clone();
            move |reason: &str| {
                let mut g = game.borrow_mut();
                let Game {
                    engine,
                    scheduler,
                    audio,
                    ..
                } = &mut *g;
                if engine.phase() == GamePhase::Playing
                    && scheduler.toggle_pause(engine) == Some(true)
                {
                    audio.pause_music();
                    log::info!("Auto-paused ({})", reason);
                }
            }
        };

        // Visibility change (tab switch, minimize)
        {
            let pause = pause.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log::info!("Typing Asteroids (native) starting with seed {}", seed);
    log::info!("Native mode runs a headless autoplay demo - use `trunk serve` to play");

    autoplay::run(seed, 3);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted typist driving the engine without a display
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use typing_asteroids::consts::SIM_DT;
    use typing_asteroids::sim::{EngineConfig, GameEvent, GamePhase, MechanicsEngine, Scheduler};
    use typing_asteroids::words::StaticWordSupply;
    use typing_asteroids::Settings;

    /// Frames between simulated key presses
    const FRAMES_PER_KEY: u32 = 9;
    /// Chance of a simulated typo
    const TYPO_RATE: f64 = 0.05;
    /// Hard stop so a perfect typist still terminates
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    pub fn run(seed: u64, levels: u32) {
        let settings = Settings::load();
        let config = EngineConfig::default();
        let mut supply = StaticWordSupply::builtin();
        let mut engine = MechanicsEngine::new(&config, seed);
        let mut scheduler = Scheduler::new(&config);
        let mut typist = Pcg32::seed_from_u64(seed ^ 0x5eed);

        engine.init_with(
            &mut supply,
            settings.word_mode(),
            settings.initial_word_length,
            0.0,
        );

        for frame in 0..MAX_FRAMES {
            let now_ms = frame as f64 * SIM_DT as f64 * 1000.0;

            if frame % FRAMES_PER_KEY == 0 && engine.phase() == GamePhase::Playing {
                let key = next_key(&engine, &mut typist);
                if let Some(key) = key {
                    engine.handle_keystroke(&key);
                }
            }

            let report = scheduler.update(&mut engine, SIM_DT, now_ms);
            if let Some(stats) = &report.level_ended {
                log::info!(
                    "Level {} done: {} wpm, {} accuracy, {} words",
                    engine.level().level,
                    stats.wpm,
                    stats.accuracy,
                    stats.words_completed
                );
            }

            for event in engine.drain_events() {
                match event {
                    GameEvent::AsteroidSpawned { word, x, .. } => {
                        log::debug!("Spawned {:?} at x={:.0}", word, x)
                    }
                    GameEvent::AsteroidDestroyed {
                        score_delta,
                        multiplier,
                        ..
                    } => log::debug!("Destroyed +{} (x{})", score_delta, multiplier),
                    GameEvent::MultiplierChanged { multiplier, .. } => {
                        log::info!("Multiplier now x{}", multiplier)
                    }
                    GameEvent::WordsRequested(_) => engine.refill_with(&mut supply),
                    GameEvent::GameOver { score, stats } => {
                        log::info!(
                            "Game over: score {}, {} wpm, {} accuracy, trouble keys {:?}",
                            score,
                            stats.wpm,
                            stats.accuracy,
                            stats.most_problematic_chars
                        );
                    }
                    _ => {}
                }
            }

            if report.game_over || report.level_started.is_some_and(|l| l > levels) {
                break;
            }
        }

        log::info!(
            "Demo finished at level {} with score {}",
            engine.level().level,
            engine.score()
        );
    }

    /// Next key for the target asteroid, occasionally a typo
    fn next_key(engine: &MechanicsEngine, rng: &mut Pcg32) -> Option<String> {
        let asteroids = engine.asteroids();
        let target = asteroids
            .iter()
            .find(|a| a.is_partially_typed())
            // Lowest asteroid is the most urgent
            .or_else(|| asteroids.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)))?;

        if rng.random_bool(TYPO_RATE) {
            let typo = rng.random_range(b'a'..=b'z') as char;
            return Some(typo.to_string());
        }
        target.next_char().map(|c| c.to_string())
    }
}
