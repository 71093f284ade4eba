//! Zar entry point
//!
//! On the web, exposes the table to the page's controls and renderer.
//! Natively, rolls a seeded table a few times and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_table {
    use wasm_bindgen::prelude::*;

    use zar::interpret::{CannedInterpreter, RollInterpreter, interpret_or_placeholder};
    use zar::sim::{DiceTable, RollEvent, TickInput, tick};
    use zar::{RollHistory, RollTuning, Settings};

    /// Table handle owned by the page
    #[wasm_bindgen]
    pub struct WebTable {
        table: DiceTable,
        settings: Settings,
        history: RollHistory,
        input: TickInput,
        accumulator: f32,
        interpreter: Option<CannedInterpreter>,
    }

    #[wasm_bindgen]
    impl WebTable {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebTable {
            let settings = Settings::load();
            let mut tuning = RollTuning::default();
            tuning.settle_secs = settings.settle_secs(tuning.settle_secs);

            let mut table = DiceTable::from_entropy(tuning);
            table.set_die_count(settings.effective_dice_count());
            table.drain_events();

            let interpreter = settings.interpretations.then_some(CannedInterpreter);
            WebTable {
                table,
                settings,
                history: RollHistory::load(),
                input: TickInput::default(),
                accumulator: 0.0,
                interpreter,
            }
        }

        /// Queue a roll for the next tick
        pub fn roll(&mut self) {
            self.input.roll = true;
        }

        /// Queue a +/- die count change for the next tick
        pub fn adjust_count(&mut self, delta: i32) {
            self.input.count_delta += delta;
        }

        pub fn is_rolling(&self) -> bool {
            self.table.is_rolling()
        }

        pub fn die_count(&self) -> usize {
            self.table.die_count()
        }

        pub fn toggle_sound(&mut self) -> bool {
            let enabled = self.settings.toggle_sound();
            self.settings.save();
            enabled
        }

        /// Run fixed ticks for `dt` seconds of frame time
        pub fn update(&mut self, dt: f32) {
            use zar::consts::SIM_DT;

            self.accumulator += dt.min(0.1);
            while self.accumulator >= SIM_DT {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.table, &input, SIM_DT);
                self.accumulator -= SIM_DT;
            }

            for event in self.table.drain_events() {
                match event {
                    RollEvent::Settled(outcome) => {
                        let now = js_sys::Date::now();
                        self.history.record(&outcome, now);
                        let interpreter =
                            self.interpreter.as_ref().map(|i| i as &dyn RollInterpreter);
                        let text = interpret_or_placeholder(interpreter, &outcome.values);
                        self.history.annotate(now, text);
                        self.history.save();
                    }
                    RollEvent::CountChanged { dice } => {
                        self.settings.dice_count = dice;
                        self.settings.save();
                    }
                    RollEvent::Started { .. } => {}
                }
            }
        }

        /// Dice, rolling flag and outcome as JSON for the renderer
        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.table.snapshot()).unwrap_or_else(|e| {
                log::error!("Failed to serialize table: {e}");
                String::from("null")
            })
        }

        /// Recent rolls as JSON, newest first
        pub fn history_json(&self) -> String {
            serde_json::to_string(&self.history).unwrap_or_else(|_| String::from("null"))
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Zar starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_table::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use zar::consts::SIM_DT;
    use zar::interpret::{CannedInterpreter, interpret_or_placeholder};
    use zar::sim::{DiceTable, RollEvent, TickInput, tick};
    use zar::{RollHistory, RollTuning, Settings};

    env_logger::init();
    log::info!("Zar (native) starting...");

    // Usage: zar [dice] [seed]; ZAR_TUNING=path/to/tuning.json overrides constants
    let mut args = std::env::args().skip(1);
    let settings = Settings::load();
    let dice = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(settings.dice_count);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(2024);

    let tuning = match std::env::var("ZAR_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => RollTuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                RollTuning::default()
            }
        },
        Err(_) => RollTuning::default(),
    };

    let mut table = DiceTable::new(tuning, seed);
    table.set_die_count(dice);
    let mut history = RollHistory::new();
    let interpreter = CannedInterpreter;

    let roll = TickInput {
        roll: true,
        ..Default::default()
    };
    let idle = TickInput::default();

    for round in 0..3 {
        tick(&mut table, &roll, SIM_DT);
        while table.is_rolling() {
            tick(&mut table, &idle, SIM_DT);
        }

        for event in table.drain_events() {
            if let RollEvent::Settled(outcome) = event {
                let text = interpret_or_placeholder(Some(&interpreter), &outcome.values);
                history.record(&outcome, f64::from(round));
                history.annotate(f64::from(round), text.clone());
                println!("Roll {}: {:?} = {}  {}", round + 1, outcome.values, outcome.total, text);
            }
        }
    }

    for die in table.dice() {
        println!(
            "  die {} shows {} at ({:.1}, {:.1}) rotated ({:.0}, {:.0}, {:.0})",
            die.id,
            die.value.map_or_else(|| "-".to_string(), |f| f.to_string()),
            die.position.x,
            die.position.y,
            die.rotation.x,
            die.rotation.y,
            die.rotation.z,
        );
    }
    if let Some(best) = history.best_total() {
        println!("Best total: {best}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
