//! Drifting rocks: a ship, a stream of rocks and a HUD
//!
//! Rocks enter from the top edge and drift across the screen. A rock that
//! leaves the padded viewport after having been on screen destroys itself,
//! and so does a bullet. Arrow keys move the ship, space fires.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use frame_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DemoConfig;

const SHIP_SPEED: f32 = 220.0;
const BULLET_SPEED: f32 = 480.0;

/// Counters shared between the world root and its entities
#[derive(Debug, Default, Clone)]
pub struct Stats {
    pub rocks_spawned: Rc<Cell<u32>>,
    pub rocks_lost: Rc<Cell<u32>>,
    pub shots_fired: Rc<Cell<u32>>,
}

fn bump(counter: &Cell<u32>) {
    counter.set(counter.get() + 1);
}

/// World root of the demo
pub struct Game {
    rock_interval: Duration,
    initial_rocks: u32,
    seed: u64,
    stats: Stats,
    elapsed: f32,
}

impl Game {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            rock_interval: Duration::from_millis(config.rock_interval_ms),
            initial_rocks: config.initial_rocks,
            seed: config.seed,
            stats: Stats::default(),
            elapsed: 0.0,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats.clone()
    }
}

impl WorldRoot for Game {
    #[allow(clippy::cast_precision_loss)]
    fn init(&mut self, scene: &mut Scene) -> Result<(), AppError> {
        let (width, height) = scene.viewport_size();
        if width == 0 || height == 0 {
            return Err(AppError::Config(format!("unusable viewport {width}x{height}")));
        }

        let ship = scene.spawn(Ship, Transform2D::at(width as f32 / 2.0, height as f32 - 40.0));
        scene.attach(ship, ShapeSprite::new(Vec2::new(24.0, 24.0), Color::rgb(0.3, 0.8, 1.0), 10));
        scene.attach(ship, Gun { stats: self.stats.clone() });

        let hud = scene.spawn(Hud, Transform2D::at(8.0, 8.0));
        scene.attach(hud, HudText { stats: self.stats.clone() });

        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(self.seed)));
        for _ in 0..self.initial_rocks {
            spawn_rock(scene, &mut rng.borrow_mut(), &self.stats);
        }

        let stats = self.stats.clone();
        scene.timers_mut().schedule_repeating(self.rock_interval, move |scene| {
            spawn_rock(scene, &mut rng.borrow_mut(), &stats);
        });

        log::info!("Spawned ship, HUD and {} rocks", self.initial_rocks);
        Ok(())
    }

    fn update(&mut self, scene: &mut Scene, delta_time: f32) {
        let before = self.elapsed;
        self.elapsed += delta_time;
        if before.floor() != self.elapsed.floor() {
            log::debug!(
                "t={:.0}s: {} entities, {} rocks lost",
                self.elapsed,
                scene.entity_count(),
                self.stats.rocks_lost.get()
            );
        }
    }

    fn shutdown(&mut self, _scene: &mut Scene) {
        log::info!(
            "Game over: {} rocks spawned, {} drifted away, {} shots fired",
            self.stats.rocks_spawned.get(),
            self.stats.rocks_lost.get(),
            self.stats.shots_fired.get()
        );
    }
}

#[allow(clippy::cast_precision_loss)]
fn spawn_rock(scene: &mut Scene, rng: &mut StdRng, stats: &Stats) {
    let (width, _) = scene.viewport_size();
    let position = Vec2::new(rng.gen_range(0.0..width.max(1) as f32), 0.0);
    let velocity = Vec2::new(rng.gen_range(-40.0..40.0), rng.gen_range(60.0..140.0));
    let size = rng.gen_range(12.0..36.0);

    let rock = scene.spawn(
        Drifter {
            velocity,
            lost: Some(stats.rocks_lost.clone()),
        },
        Transform2D::from_position(position).with_scale(Vec2::new(size, size)),
    );
    scene.attach(rock, ShapeSprite::new(Vec2::new(1.0, 1.0), Color::rgb(0.6, 0.5, 0.4), 0));
    bump(&stats.rocks_spawned);
}

/// Player ship, steered by the held arrow keys
struct Ship;

impl Entity for Ship {
    fn name(&self) -> &str {
        "ship"
    }

    fn update(&mut self, ctx: &mut EntityCtx<'_>, delta_time: f32) {
        let input = ctx.scene.input();
        let mut direction = Vec2::zeros();
        if input.is_key_down(KeyCode::Left) {
            direction.x -= 1.0;
        }
        if input.is_key_down(KeyCode::Right) {
            direction.x += 1.0;
        }
        if input.is_key_down(KeyCode::Up) {
            direction.y -= 1.0;
        }
        if input.is_key_down(KeyCode::Down) {
            direction.y += 1.0;
        }
        if let Some(transform) = ctx.transform_mut() {
            transform.translate(direction * SHIP_SPEED * delta_time);
        }
    }

    fn on_became_hidden(&mut self, ctx: &mut EntityCtx<'_>) {
        log::info!("Ship left the screen");
        ctx.scene.request_quit();
    }
}

/// Anything moving in a straight line until it leaves the screen
struct Drifter {
    velocity: Vec2,
    /// Counter bumped when the drifter leaves the screen
    lost: Option<Rc<Cell<u32>>>,
}

impl Entity for Drifter {
    fn name(&self) -> &str {
        "drifter"
    }

    fn update(&mut self, ctx: &mut EntityCtx<'_>, delta_time: f32) {
        let step = self.velocity * delta_time;
        if let Some(transform) = ctx.transform_mut() {
            transform.translate(step);
        }
    }

    fn on_became_hidden(&mut self, ctx: &mut EntityCtx<'_>) {
        if let Some(lost) = &self.lost {
            bump(lost);
        }
        ctx.destroy_self();
    }
}

/// Fires a bullet on every space press
struct Gun {
    stats: Stats,
}

impl Controllable for Gun {
    fn handle_event(&mut self, ctx: &mut EntityCtx<'_>, event: &InputEvent) {
        if let InputEvent::Key { key: KeyCode::Space, pressed: true } = event {
            let muzzle = ctx.transform().position - Vec2::new(0.0, 16.0);
            let bullet = ctx.scene.spawn(
                Drifter {
                    velocity: Vec2::new(0.0, -BULLET_SPEED),
                    lost: None,
                },
                Transform2D::from_position(muzzle),
            );
            ctx.scene
                .attach(bullet, ShapeSprite::new(Vec2::new(3.0, 8.0), Color::WHITE, 5));
            bump(&self.stats.shots_fired);
        }
    }
}

impl Component for Gun {
    fn as_controllable(&mut self) -> Option<&mut dyn Controllable> {
        Some(self)
    }
}

/// Filled rectangle centered on the owner
struct ShapeSprite {
    size: Vec2,
    color: Color,
    priority: i32,
}

impl ShapeSprite {
    fn new(size: Vec2, color: Color, priority: i32) -> Self {
        Self { size, color, priority }
    }
}

impl RenderSurface for ShapeSprite {
    fn render_priority(&self) -> i32 {
        self.priority
    }

    fn draw(&mut self, transform: &Transform2D, canvas: &mut dyn Canvas) {
        canvas.submit(DrawCommand::Rect {
            center: transform.position,
            size: self.size.component_mul(&transform.scale),
            color: self.color,
        });
    }
}

impl Component for ShapeSprite {
    fn as_render_surface(&mut self) -> Option<&mut dyn RenderSurface> {
        Some(self)
    }
}

/// Anchor for the score line
struct Hud;

impl Entity for Hud {}

struct HudText {
    stats: Stats,
}

impl RenderSurface for HudText {
    fn render_priority(&self) -> i32 {
        100
    }

    fn draw(&mut self, transform: &Transform2D, canvas: &mut dyn Canvas) {
        canvas.submit(DrawCommand::Text {
            text: format!(
                "rocks {}  lost {}  shots {}",
                self.stats.rocks_spawned.get(),
                self.stats.rocks_lost.get(),
                self.stats.shots_fired.get()
            ),
            position: transform.position,
            color: Color::WHITE,
        });
    }
}

impl Component for HudText {
    fn as_render_surface(&mut self) -> Option<&mut dyn RenderSurface> {
        Some(self)
    }
}
