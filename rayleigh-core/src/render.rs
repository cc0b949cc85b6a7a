//! Drawing contract and the painter that walks a simulation frame.
//!
//! The core never talks to a window. Anything that can draw lines, circles
//! and centred text implements [`Canvas`]; [`paint_frame`] issues the calls
//! for one frame in a fixed order: static scene first (source, particles,
//! sphere, sector dividers and letters, design circle, right-edge wall), then
//! every segment, then the sector counters.

use crate::config::SimulationDesc;
use crate::math::{DVec2, Point, polar};
use crate::scene::Scene;
use crate::wedge::{WEDGE_COUNT, WEDGE_LABELS, sector_mid_angle, sector_start_angle};
use crate::world::Simulation;

/// An opaque 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Self = Self(255, 255, 255);
    pub const BLACK: Self = Self(0, 0, 0);
    pub const YELLOW: Self = Self(255, 255, 0);
    pub const RED: Self = Self(255, 0, 0);
    pub const BLUE: Self = Self(0, 0, 255);
    pub const LIGHT_BLUE: Self = Self(0, 169, 211);
    pub const GREY: Self = Self(128, 128, 128);
    pub const BROWN: Self = Self(139, 69, 19);
    pub const DARK_BLUE: Self = Self(0, 0, 139);
}

/// How a circle is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleStyle {
    Filled,
    /// Outline with the given stroke width
    Stroked(f32),
}

/// Minimal drawing surface the painter needs.
///
/// Coordinates are playfield coordinates (x right, y down); implementations
/// map them onto their own surface.
pub trait Canvas {
    /// Fills the whole surface with `color`.
    fn clear(&mut self, color: Rgb);

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb, width: f32);

    fn draw_circle(&mut self, center: Point, radius: f64, color: Rgb, style: CircleStyle);

    /// Renders `text` centred on `anchor`.
    fn draw_text(&mut self, text: &str, anchor: Point, color: Rgb);
}

/// Colours and sizes of the static scene
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub source: Rgb,
    pub particle: Rgb,
    pub sphere: Rgb,
    pub divider: Rgb,
    pub design_circle: Rgb,
    pub wall: Rgb,
    pub counter: Rgb,
    pub divider_width: f32,
    pub design_circle_width: f32,
    pub wall_width: f32,
    pub segment_width: f32,
    /// Distance of the sector letters from the centre, as a fraction of the radius
    pub letter_radius_factor: f64,
    /// Distance of the counters outside the sphere boundary
    pub counter_offset: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            source: Rgb::YELLOW,
            particle: Rgb::GREY,
            sphere: Rgb::LIGHT_BLUE,
            divider: Rgb::DARK_BLUE,
            design_circle: Rgb::BLUE,
            wall: Rgb::BROWN,
            counter: Rgb::WHITE,
            divider_width: 2.0,
            design_circle_width: 4.0,
            wall_width: 4.0,
            segment_width: 2.0,
            letter_radius_factor: 0.5,
            counter_offset: 30.0,
        }
    }
}

impl Palette {
    /// Default colours with the segment stroke taken from `desc`
    pub fn from_desc(desc: &SimulationDesc) -> Self {
        Self {
            segment_width: desc.line_width,
            ..Self::default()
        }
    }
}

/// Draws one complete frame of `simulation` onto `canvas`.
pub fn paint_frame<C: Canvas + ?Sized>(canvas: &mut C, simulation: &Simulation, palette: &Palette) {
    canvas.clear(palette.background);
    paint_scene(canvas, simulation.scene(), palette);
    paint_segments(canvas, simulation, palette);
    paint_counters(canvas, simulation, palette);
}

/// Source, particles, sphere with its sector dividers and letters, design circle and wall.
pub fn paint_scene<C: Canvas + ?Sized>(canvas: &mut C, scene: &Scene, palette: &Palette) {
    canvas.draw_circle(
        scene.source(),
        scene.source_radius(),
        palette.source,
        CircleStyle::Filled,
    );

    for particle in scene.particles() {
        canvas.draw_circle(
            *particle,
            scene.particle_radius(),
            palette.particle,
            CircleStyle::Filled,
        );
    }

    let sphere = scene.sphere();
    canvas.draw_circle(sphere.center, sphere.radius, palette.sphere, CircleStyle::Filled);

    for index in 0..WEDGE_COUNT {
        let boundary = polar(sphere.center, sphere.radius, sector_start_angle(index));
        canvas.draw_line(sphere.center, boundary, palette.divider, palette.divider_width);

        let letter = polar(
            sphere.center,
            sphere.radius * palette.letter_radius_factor,
            sector_mid_angle(index),
        );
        canvas.draw_text(WEDGE_LABELS[index], letter, palette.divider);
    }

    canvas.draw_circle(
        sphere.center,
        scene.outer_radius(),
        palette.design_circle,
        CircleStyle::Stroked(palette.design_circle_width),
    );

    let bounds = scene.bounds();
    let wall_x = bounds.width - palette.wall_width as f64 / 2.0;
    canvas.draw_line(
        DVec2::new(wall_x, 0.0),
        DVec2::new(wall_x, bounds.height),
        palette.wall,
        palette.wall_width,
    );
}

/// Every live segment as a line from its start to its (clamped) endpoint.
pub fn paint_segments<C: Canvas + ?Sized>(
    canvas: &mut C,
    simulation: &Simulation,
    palette: &Palette,
) {
    let width = simulation.scene().width();
    for segment in simulation.segments() {
        canvas.draw_line(
            segment.start,
            segment.endpoint(width),
            segment.class.color(),
            palette.segment_width,
        );
    }
}

/// One `W:_ R:_ B:_` counter per sector, just outside the sphere.
pub fn paint_counters<C: Canvas + ?Sized>(
    canvas: &mut C,
    simulation: &Simulation,
    palette: &Palette,
) {
    let sphere = simulation.scene().sphere();
    let tally = simulation.tally();
    for (index, counts) in tally.sectors().iter().enumerate() {
        let anchor = polar(
            sphere.center,
            sphere.radius + palette.counter_offset,
            sector_mid_angle(index),
        );
        canvas.draw_text(&counts.label(), anchor, palette.counter);
    }
}
