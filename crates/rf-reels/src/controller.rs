//! Spin lifecycle controller
//!
//! One spin, frame by frame:
//!
//! 1. `press_spin` / `start_play`: take a stake, plan a staggered stop for
//!    every reel and hand each reel's position to the tween engine
//! 2. `advance_frame`: write the tween values, recompute blur and slot
//!    offsets, recycle textures at the wrap boundary, apply the override
//! 3. When the last reel's tween reports its final value, the same frame's
//!    update has already placed every slot, so the grid is read right away
//!    and published

use crossbeam_channel::Receiver;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rf_tween::{TweenEngine, TweenId, Tweener};

use crate::balance::BalanceGate;
use crate::config::ReelConfig;
use crate::error::ReelResult;
use crate::fixer::{FixerService, FixerSettings, OverrideSlots};
use crate::lock::LockState;
use crate::reel::{Reel, crossed_wrap};
use crate::result::{ResultGrid, ResultSink};
use crate::symbols::SymbolSet;

/// Stake collected per accepted spin
pub const SPIN_STAKE: i64 = 1;

/// How a trigger was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResponse {
    Started,
    /// A spin is running; the trigger was ignored
    AlreadySpinning,
    /// Out of funds; the trigger is detached
    Locked,
}

/// Where and when one reel stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub reel_index: usize,
    pub from: f64,
    pub target: f64,
    pub duration_ms: f64,
}

/// Owns the reels and drives one spin at a time
pub struct SpinController<T: TweenEngine = Tweener> {
    config: ReelConfig,
    symbols: SymbolSet,
    reels: Vec<Reel>,
    tweener: T,
    rng: ChaCha8Rng,
    balance: Box<dyn BalanceGate>,
    broke_rx: Receiver<bool>,
    fixer_rx: Option<Receiver<Option<FixerSettings>>>,
    overrides: OverrideSlots,
    sink: Box<dyn ResultSink>,
    lock: LockState,
    in_progress: bool,
    final_tween: Option<TweenId>,
    last_plan: Vec<SpinPlan>,
    last_result: Option<ResultGrid>,
    spin_count: u64,
}

impl SpinController<Tweener> {
    /// Controller with the default tween engine and an entropy-seeded RNG
    pub fn new(
        config: ReelConfig,
        balance: impl BalanceGate + 'static,
        sink: impl ResultSink + 'static,
    ) -> ReelResult<Self> {
        let rng = ChaCha8Rng::from_rng(&mut rand::rng());
        Self::with_parts(config, balance, sink, Tweener::new(), rng)
    }

    /// Reproducible controller: same seed and config, same spins
    pub fn with_seed(
        config: ReelConfig,
        balance: impl BalanceGate + 'static,
        sink: impl ResultSink + 'static,
        seed: u64,
    ) -> ReelResult<Self> {
        Self::with_parts(
            config,
            balance,
            sink,
            Tweener::new(),
            ChaCha8Rng::seed_from_u64(seed),
        )
    }
}

impl<T: TweenEngine> SpinController<T> {
    pub fn with_parts(
        config: ReelConfig,
        balance: impl BalanceGate + 'static,
        sink: impl ResultSink + 'static,
        tweener: T,
        mut rng: ChaCha8Rng,
    ) -> ReelResult<Self> {
        config.validate()?;
        let symbols = SymbolSet::new(config.symbols.clone())?;
        let reels = (0..config.reel_count)
            .map(|_| Reel::new(&symbols, config.symbol_size, &mut rng))
            .collect();
        let broke_rx = balance.subscribe_broke();

        let mut controller = Self {
            config,
            symbols,
            reels,
            tweener,
            rng,
            balance: Box::new(balance),
            broke_rx,
            fixer_rx: None,
            overrides: OverrideSlots::new(),
            sink: Box::new(sink),
            lock: LockState::default(),
            in_progress: false,
            final_tween: None,
            last_plan: Vec::new(),
            last_result: None,
            spin_count: 0,
        };
        controller.sync_inputs();
        Ok(controller)
    }

    /// Follow an override store
    pub fn with_fixer(mut self, fixer: &FixerService) -> Self {
        self.fixer_rx = Some(fixer.subscribe());
        self.sync_inputs();
        self
    }

    /// Reseed the symbol draw
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn is_spinning(&self) -> bool {
        self.in_progress
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    pub fn active_override(&self) -> Option<&FixerSettings> {
        self.overrides.active()
    }

    pub fn has_pending_override(&self) -> bool {
        self.overrides.has_pending()
    }

    /// Plan of the current or most recent spin
    pub fn last_plan(&self) -> &[SpinPlan] {
        &self.last_plan
    }

    pub fn last_result(&self) -> Option<&ResultGrid> {
        self.last_result.as_ref()
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INPUTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drain balance and override subscriptions
    fn sync_inputs(&mut self) {
        while let Ok(is_broke) = self.broke_rx.try_recv() {
            let next = self.lock.on_broke(is_broke);
            if next != self.lock {
                log::debug!("Spin trigger {:?} -> {:?}", self.lock, next);
                self.lock = next;
            }
        }

        if let Some(rx) = &self.fixer_rx {
            while let Ok(update) = rx.try_recv() {
                self.overrides.receive(update);
            }
        }

        if !self.in_progress {
            self.commit_overrides();
        }
    }

    fn commit_overrides(&mut self) {
        if !self.overrides.commit() {
            return;
        }

        match self.overrides.active() {
            Some(settings) => {
                log::debug!("Override active: {} entr(ies)", settings.entries.len());
                for name in settings.forced_symbols() {
                    if !self.symbols.contains(name) {
                        log::warn!("Override names unknown symbol '{}', cell stays random", name);
                    }
                }
            }
            None => log::debug!("Override cleared"),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN
    // ═══════════════════════════════════════════════════════════════════════════

    /// Spin input event; ignored while locked
    pub fn press_spin(&mut self) -> ReelResult<TriggerResponse> {
        self.sync_inputs();
        if !self.lock.trigger_attached() {
            log::debug!("Spin pressed while locked");
            return Ok(TriggerResponse::Locked);
        }
        self.start_play()
    }

    /// Targets and durations a spin started now would use
    pub fn plan_spin(&self) -> Vec<SpinPlan> {
        self.reels
            .iter()
            .enumerate()
            .map(|(i, reel)| SpinPlan {
                reel_index: i,
                from: reel.position,
                target: reel.position + self.config.travel_distance(i),
                duration_ms: self.config.timing.reel_duration(i),
            })
            .collect()
    }

    /// Start a spin unless one is already running
    pub fn start_play(&mut self) -> ReelResult<TriggerResponse> {
        if self.in_progress {
            log::debug!("Spin already in progress, trigger ignored");
            return Ok(TriggerResponse::AlreadySpinning);
        }
        // Capture the override before the spin locks it in
        self.sync_inputs();

        let plan = self.plan_spin();
        let easing = self.config.easing;
        let mut final_tween = None;
        for step in &plan {
            let id = self.tweener.tween_to(
                step.reel_index,
                step.from,
                step.target,
                step.duration_ms,
                easing,
            )?;
            final_tween = Some(id);
        }

        self.in_progress = true;
        self.final_tween = final_tween;
        self.last_plan = plan;
        self.spin_count += 1;
        self.balance.decrease_cash(SPIN_STAKE);

        log::info!(
            "Spin {} started: {} reels, {:.0} ms",
            self.spin_count,
            self.reels.len(),
            self.config.timing.total_spin_duration(self.reels.len())
        );
        Ok(TriggerResponse::Started)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FRAME LOOP
    // ═══════════════════════════════════════════════════════════════════════════

    /// Advance one display frame. Returns the grid if the spin completed.
    pub fn advance_frame(&mut self) -> Option<ResultGrid> {
        self.advance_by(self.config.frame_interval_ms)
    }

    /// Advance by an explicit frame time
    pub fn advance_by(&mut self, dt_ms: f64) -> Option<ResultGrid> {
        self.sync_inputs();
        if !self.in_progress && !self.tweener.is_active() {
            return None;
        }

        let mut completed = false;
        for step in self.tweener.advance(dt_ms) {
            if let Some(reel) = self.reels.get_mut(step.key) {
                reel.position = step.value;
            }
            if step.finished && Some(step.id) == self.final_tween {
                completed = true;
            }
        }

        self.update_reels_on_spin();

        if completed {
            self.handle_complete_game()
        } else {
            None
        }
    }

    fn update_reels_on_spin(&mut self) {
        for reel_index in 0..self.reels.len() {
            self.reels[reel_index].update_blur(self.config.blur_scale);
            self.update_spinning_reel_symbols(reel_index);
        }
    }

    fn update_spinning_reel_symbols(&mut self, reel_index: usize) {
        let cell = self.config.symbol_size;
        let reel = &mut self.reels[reel_index];

        for slot_index in 0..reel.symbols.len() {
            let y = reel.slot_offset(slot_index, cell);
            let slot = &mut reel.symbols[slot_index];
            let previous_y = slot.y;
            slot.y = y;

            // Slot 0 is the buffer above the window; slot `row + 1` lands on `row`
            let forced = self
                .overrides
                .forced_symbol(reel_index, slot_index as i32 - 1)
                .and_then(|name| self.symbols.get(name));

            if let Some(texture) = forced {
                slot.assign(texture, cell);
            } else if crossed_wrap(previous_y, y, cell) {
                slot.assign(self.symbols.random(&mut self.rng), cell);
            }
        }
    }

    fn handle_complete_game(&mut self) -> Option<ResultGrid> {
        self.in_progress = false;
        self.final_tween = None;
        self.commit_overrides();

        match ResultGrid::from_reels(&self.reels, self.config.symbol_size) {
            Ok(grid) => {
                log::info!("Spin {} complete:\n{}", self.spin_count, grid);
                self.last_result = Some(grid.clone());
                self.sink.publish(grid.clone());
                Some(grid)
            }
            Err(e) => {
                log::warn!("Spin {} produced no result: {}", self.spin_count, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::CashBalance;
    use crate::fixer::FixedSymbol;
    use crate::reel::VISIBLE_ROWS;
    use crate::timing::TimingProfile;
    use rf_tween::EasingFunction;

    const MAX_FRAMES: usize = 1_000;

    fn studio_controller(balance: &CashBalance, seed: u64) -> SpinController {
        SpinController::with_seed(
            ReelConfig::with_profile(TimingProfile::Studio),
            balance.clone(),
            Vec::<ResultGrid>::new(),
            seed,
        )
        .unwrap()
    }

    fn finish(controller: &mut SpinController) -> ResultGrid {
        for _ in 0..MAX_FRAMES {
            if let Some(grid) = controller.advance_frame() {
                return grid;
            }
        }
        panic!("spin did not complete within {MAX_FRAMES} frames");
    }

    #[test]
    fn test_plan_staggers_reels() {
        let balance = CashBalance::default();
        let controller = studio_controller(&balance, 1);
        let plan = controller.plan_spin();

        assert_eq!(plan.len(), 3);
        for pair in plan.windows(2) {
            assert!(pair[1].target > pair[0].target);
            assert!(pair[1].duration_ms > pair[0].duration_ms);
        }
        assert_eq!(plan[0].target, 12.0);
        assert_eq!(plan[2].duration_ms, 700.0);
    }

    #[test]
    fn test_start_collects_stake_once() {
        let balance = CashBalance::new(5);
        let mut controller = studio_controller(&balance, 1);

        assert_eq!(controller.start_play().unwrap(), TriggerResponse::Started);
        let plan = controller.last_plan().to_vec();
        assert_eq!(balance.cash(), 4);

        assert_eq!(
            controller.start_play().unwrap(),
            TriggerResponse::AlreadySpinning
        );
        controller.advance_frame();
        assert_eq!(
            controller.press_spin().unwrap(),
            TriggerResponse::AlreadySpinning
        );
        assert_eq!(controller.last_plan(), plan.as_slice());
        assert_eq!(balance.cash(), 4);
        assert_eq!(controller.spin_count(), 1);
    }

    #[test]
    fn test_spin_completes_with_full_grid() {
        let balance = CashBalance::default();
        let mut controller = studio_controller(&balance, 3);
        controller.press_spin().unwrap();

        let grid = finish(&mut controller);
        assert!(!controller.is_spinning());
        assert_eq!(grid.rows().len(), VISIBLE_ROWS);
        assert_eq!(grid.reel_count(), 3);
        for row in grid.rows() {
            for name in row {
                assert!(controller.symbols.contains(name));
            }
        }
        assert_eq!(controller.last_result(), Some(&grid));

        for (reel, plan) in controller.reels().iter().zip(controller.last_plan()) {
            assert_eq!(reel.position, plan.target);
        }
    }

    #[test]
    fn test_idle_frames_are_noops() {
        let balance = CashBalance::default();
        let mut controller = studio_controller(&balance, 3);
        let before = controller.reels().to_vec();
        for _ in 0..10 {
            assert!(controller.advance_frame().is_none());
        }
        for (a, b) in before.iter().zip(controller.reels()) {
            assert_eq!(a.symbols, b.symbols);
        }
    }

    #[test]
    fn test_forced_cell_lands() {
        let balance = CashBalance::default();
        let fixer = FixerService::new();
        fixer.set_settings(Some(FixerSettings::new(vec![
            FixedSymbol::new(0, 1, "CHERRY"),
            FixedSymbol::new(2, 2, "SEVEN"),
        ])));
        let mut controller = studio_controller(&balance, 9).with_fixer(&fixer);

        controller.press_spin().unwrap();
        let grid = finish(&mut controller);
        assert_eq!(grid.cell(1, 0), Some("CHERRY"));
        assert_eq!(grid.cell(2, 2), Some("SEVEN"));
    }

    #[test]
    fn test_unknown_forced_symbol_stays_random() {
        let balance = CashBalance::default();
        let fixer = FixerService::new();
        fixer.set_settings(Some(FixerSettings::new(vec![FixedSymbol::new(
            0, 1, "DIAMOND",
        )])));
        let mut controller = studio_controller(&balance, 9).with_fixer(&fixer);

        controller.press_spin().unwrap();
        let grid = finish(&mut controller);
        let cell = grid.cell(1, 0).unwrap();
        assert!(controller.symbols.contains(cell));
    }

    #[test]
    fn test_configured_easing_drives_reels() {
        let peak_past_target = |easing: EasingFunction| {
            let config = ReelConfig {
                easing,
                ..ReelConfig::with_profile(TimingProfile::Studio)
            };
            let balance = CashBalance::default();
            let mut controller =
                SpinController::with_seed(config, balance, Vec::<ResultGrid>::new(), 4).unwrap();
            controller.press_spin().unwrap();

            let targets: Vec<f64> = controller.last_plan().iter().map(|p| p.target).collect();
            let mut peak = f64::MIN;
            while controller.is_spinning() {
                controller.advance_frame();
                for (reel, target) in controller.reels().iter().zip(&targets) {
                    peak = peak.max(reel.position - target);
                }
            }
            peak
        };

        assert!(peak_past_target(EasingFunction::Linear) <= 0.0);
        assert!(peak_past_target(EasingFunction::default()) > 0.0);
    }
}
