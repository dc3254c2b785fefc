use crate::config::Tuning;
use crate::sim::{Phase, Simulation};
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(u8, u8, u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn halved(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const BORDER: Rgb = Rgb(24, 28, 36);
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PANEL: Rgb = Rgb(220, 195, 120);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![BORDER; w * h],
        }
    }

    /// Buffer covering a terminal of `cols` x `rows` cells.
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, BORDER);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill(&mut self, c: Rgb) {
        self.px.iter_mut().for_each(|p| *p = c);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn darken(&mut self) {
        self.px.iter_mut().for_each(|p| *p = p.halved());
    }

    /// Flush to the terminal, two pixels per cell using the upper half block.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = None;
        let mut prev_bg = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Draw one digit with each glyph cell as a `scale` x `scale` block.
fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, d: u8, scale: i32, fg: Rgb) {
    let glyph = &DIGITS[d as usize];
    let lit: Vec<(i32, i32)> = (0..15)
        .filter(|&i| glyph[i] == 1)
        .map(|i| (x + (i % 3) as i32 * scale, y + (i / 3) as i32 * scale))
        .collect();
    for &(px, py) in &lit {
        buf.fill_rect(px + scale, py + scale, scale, scale, SHADOW);
    }
    for &(px, py) in &lit {
        buf.fill_rect(px, py, scale, scale, fg);
    }
}

/// Draw `n` centred on `cx`, 3 cells per digit plus 1 cell spacing.
fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, scale: i32, fg: Rgb) {
    let s = n.to_string();
    let advance = 4 * scale;
    let total_w = s.len() as i32 * advance - scale;
    let start_x = cx - total_w / 2;
    for (i, ch) in s.bytes().enumerate() {
        draw_digit(buf, start_x + i as i32 * advance, y, ch - b'0', scale, fg);
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Uniform mapping from playfield units to buffer pixels, centred
/// horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Viewport {
    scale: f32,
    ox: i32,
    w: i32,
    h: i32,
}

impl Viewport {
    fn fit(buf: &PixelBuf, tuning: &Tuning) -> Self {
        let scale = (buf.width() as f32 / tuning.width).min(buf.height() as f32 / tuning.height);
        let w = (tuning.width * scale).round() as i32;
        let h = (tuning.height * scale).round() as i32;
        Self {
            scale,
            ox: (buf.width() as i32 - w) / 2,
            w,
            h,
        }
    }

    fn x(&self, x: f32) -> i32 {
        self.ox + (x * self.scale).round() as i32
    }

    fn y(&self, y: f32) -> i32 {
        (y * self.scale).round() as i32
    }

    fn len(&self, l: f32) -> i32 {
        (l * self.scale).round() as i32
    }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Draw one frame of `sim` into `buf`.
pub fn draw(sim: &Simulation, buf: &mut PixelBuf) {
    let scene = Scene {
        sim,
        view: Viewport::fit(buf, sim.tuning()),
    };
    scene.draw(buf);
}

struct Scene<'a> {
    sim: &'a Simulation,
    view: Viewport,
}

impl Scene<'_> {
    fn tuning(&self) -> &Tuning {
        self.sim.tuning()
    }

    fn ground_y(&self) -> i32 {
        self.view.y(self.tuning().ground_y())
    }

    /// Ground scroll in pixels.
    fn scroll(&self) -> f64 {
        (self.sim.ground_scroll() * self.view.scale) as f64
    }

    fn draw(&self, buf: &mut PixelBuf) {
        buf.fill(BORDER);
        self.draw_sky(buf);
        self.draw_hills(buf);
        self.draw_pipes(buf);
        self.draw_ground(buf);
        self.draw_bird(buf);
        self.draw_letterbox(buf);
        self.draw_score(buf);

        if let Phase::GameOver(_) = self.sim.phase() {
            self.draw_game_over(buf);
        }
    }

    fn draw_sky(&self, buf: &mut PixelBuf) {
        let sky_h = self.ground_y().max(1);
        for y in 0..sky_h {
            let t = (y * 256 / sky_h) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            buf.fill_rect(self.view.ox, y, self.view.w, 1, c);
        }
    }

    fn draw_hills(&self, buf: &mut PixelBuf) {
        let base = self.ground_y();
        let s = self.view.h as f64 / 48.0;
        for x in 0..self.view.w {
            // Far hills
            let fx = (x as f64 + self.scroll() * 0.2) * 0.04;
            let h = (fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0) * s;
            let top = base - h as i32 - (4.0 * s) as i32;
            for y in top..base {
                buf.set(self.view.ox + x, y, HILL_FAR);
            }
            // Near hills
            let fx = (x as f64 + self.scroll() * 0.4) * 0.06;
            let h = (fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0) * s;
            let top = base - h as i32 - (2.0 * s) as i32;
            for y in top..base {
                buf.set(self.view.ox + x, y, HILL_NEAR);
            }
        }
    }

    fn draw_ground(&self, buf: &mut PixelBuf) {
        let gy = self.ground_y();
        let scroll = self.scroll();
        for x in 0..self.view.w {
            let alt = ((x as f64 + scroll) as i32 / 3) % 2 == 0;
            buf.set(self.view.ox + x, gy, if alt { GRASS } else { GRASS_LIGHT });
            buf.set(self.view.ox + x, gy + 1, GRASS);
        }
        for y in (gy + 2)..self.view.h {
            for x in 0..self.view.w {
                let stripe = ((x as f64 + scroll * 0.8) as i32 + (y - gy) * 2) % 12 < 6;
                buf.set(self.view.ox + x, y, if stripe { DIRT } else { DIRT_DARK });
            }
        }
    }

    fn draw_pipes(&self, buf: &mut PixelBuf) {
        let tuning = self.tuning();
        let pw = self.view.len(tuning.pipe_width).max(1);
        let cap_extra = (pw / 8).max(1);
        let cap_h = self.view.len(tuning.pipe_width * 0.4).max(2);
        let ground = self.ground_y();

        for pipe in self.sim.field().pipes() {
            let px = self.view.x(pipe.x);
            let gap_top = self.view.y(pipe.gap_top());
            let gap_bot = self.view.y(pipe.gap_top() + tuning.pipe_gap);

            // Top pipe body
            for x in 0..pw {
                let c = pipe_shade(x, pw);
                for y in 0..gap_top - cap_h {
                    buf.set(px + x, y, c);
                }
            }
            // Caps, with darkened edges
            for x in -cap_extra..(pw + cap_extra) {
                let c = pipe_shade(x + cap_extra, pw + cap_extra * 2);
                for y in (gap_top - cap_h)..gap_top {
                    buf.set(px + x, y, c);
                }
                buf.set(px + x, gap_top - cap_h, CAP_DARK);
                buf.set(px + x, gap_top - 1, CAP_DARK);

                for y in gap_bot..(gap_bot + cap_h) {
                    buf.set(px + x, y, c);
                }
                buf.set(px + x, gap_bot, CAP_DARK);
                buf.set(px + x, gap_bot + cap_h - 1, CAP_DARK);
            }
            // Bottom pipe body
            for x in 0..pw {
                let c = pipe_shade(x, pw);
                for y in (gap_bot + cap_h)..ground {
                    buf.set(px + x, y, c);
                }
            }
        }
    }

    fn draw_bird(&self, buf: &mut PixelBuf) {
        let bird = self.sim.bird();
        let cx = self.view.x(bird.x());
        let cy = self.view.y(bird.y);
        // Hitbox is 4s wide
        let s = self.view.len(self.tuning().bird_size) as f64 / 4.0;

        let tilt = (-bird.tilt_degrees() / 25.0).clamp(-1.0, 1.0).round() as i32;

        // Body core
        let bw = (3.0 * s).max(2.0) as i32;
        let bh = (2.0 * s).max(2.0) as i32;
        buf.fill_rect(cx - bw, cy - bh, bw * 2 + 1, bh * 2, BIRD_Y);
        buf.fill_rect(cx - bw + 1, cy - bh, bw * 2 - 2, 1.max((s * 0.8) as i32), BIRD_HI);

        // Wing: up, mid, down
        let wing_y_off = bird.frame() as i32 - 1;
        let wing_h = (1.5 * s).max(1.0) as i32;
        let wing_w = (2.0 * s).max(1.0) as i32;
        buf.fill_rect(cx - bw + 1, cy + wing_y_off + tilt, wing_w, wing_h, BIRD_WING);

        // Eye
        let ex = cx + bw - (1.5 * s) as i32;
        let ey = cy - bh + (1.0 * s).max(1.0) as i32;
        let eye_r = (0.8 * s).max(1.0) as i32;
        buf.fill_rect(ex, ey, eye_r + 1, eye_r + 1, BIRD_EYE);
        buf.set(ex + eye_r, ey + eye_r, BIRD_PUPIL);

        // Beak
        let beak_x = cx + bw;
        let beak_y = cy - (0.5 * s) as i32 + tilt;
        let beak_w = (2.5 * s).max(2.0) as i32;
        let beak_h = (1.5 * s).max(1.0) as i32;
        buf.fill_rect(beak_x, beak_y, beak_w, beak_h / 2 + 1, BIRD_BEAK_HI);
        buf.fill_rect(beak_x, beak_y + beak_h / 2 + 1, beak_w, beak_h / 2, BIRD_BEAK);

        // Tail
        let tail_w = (1.5 * s).max(1.0) as i32;
        buf.fill_rect(cx - bw - tail_w, cy - 1 - tilt, tail_w, 2, BIRD_WING);
    }

    /// Paint over anything that spilled outside the playfield.
    fn draw_letterbox(&self, buf: &mut PixelBuf) {
        let h = buf.height() as i32;
        buf.fill_rect(0, 0, self.view.ox, h, BORDER);
        let right = self.view.ox + self.view.w;
        buf.fill_rect(right, 0, buf.width() as i32 - right, h, BORDER);
        buf.fill_rect(0, self.view.h, buf.width() as i32, h - self.view.h, BORDER);
    }

    fn draw_score(&self, buf: &mut PixelBuf) {
        let cx = self.view.ox + self.view.w / 2;
        draw_number(buf, cx, 4, self.sim.score(), 2, WHITE);
        if !self.sim.is_game_over() {
            draw_number(buf, cx, 17, self.sim.best_score(), 1, BIRD_Y);
        }
    }

    fn draw_game_over(&self, buf: &mut PixelBuf) {
        let cx = self.view.ox + self.view.w / 2;
        let cy = self.view.h / 2;
        let panel_w = (self.view.w * 3 / 5).max(20);
        let panel_h = 24;

        buf.darken();

        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
        buf.fill_rect(px, py, panel_w, panel_h, DIRT);
        buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

        draw_number(buf, cx, py + 3, self.sim.score(), 2, WHITE);
        draw_number(buf, cx, py + 16, self.sim.best_score(), 1, BIRD_Y);
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Simulation;
    use std::time::Duration;

    fn sim() -> Simulation {
        Simulation::new(Tuning::default(), 3, 5)
    }

    #[test]
    fn test_viewport_fits_and_centres() {
        let t = Tuning::default();
        let buf = PixelBuf::new(100, 60);
        let view = Viewport::fit(&buf, &t);
        assert_eq!(view.scale, 0.1);
        assert_eq!((view.w, view.h), (40, 60));
        assert_eq!(view.ox, 30);
        assert_eq!(view.x(0.0), 30);
        assert_eq!(view.y(t.ground_y()), 52);
    }

    #[test]
    fn test_draw_fills_letterbox() {
        let mut buf = PixelBuf::new(100, 60);
        draw(&sim(), &mut buf);
        assert_eq!(buf.get(0, 30), BORDER);
        assert_eq!(buf.get(99, 30), BORDER);
        assert_ne!(buf.get(50, 30), BORDER);
    }

    #[test]
    fn test_draw_bird_at_its_position() {
        let mut buf = PixelBuf::new(200, 120);
        let sim = sim();
        draw(&sim, &mut buf);
        // Bird centre is at (80, 300) in playfield units
        let view = Viewport::fit(&buf, sim.tuning());
        let c = buf.get(view.x(80.0) as usize, view.y(300.0) as usize);
        assert!(c == BIRD_Y || c == BIRD_WING || c == BIRD_HI);
    }

    #[test]
    fn test_game_over_darkens() {
        let mut sim = sim();
        while !sim.is_game_over() {
            sim.step(Duration::from_millis(16));
        }
        let mut live = PixelBuf::new(100, 60);
        draw(&Simulation::new(Tuning::default(), 3, 5), &mut live);
        let mut dead = PixelBuf::new(100, 60);
        draw(&sim, &mut dead);
        // Sky in the top-left corner of the playfield
        assert_eq!(dead.get(31, 20), live.get(31, 20).halved());
    }

    #[test]
    fn test_tiny_buffers_do_not_panic() {
        let mut sim = sim();
        for _ in 0..120 {
            sim.step(Duration::from_millis(16));
        }
        for (w, h) in [(0, 0), (1, 2), (3, 1), (10, 4)] {
            let mut buf = PixelBuf::new(w, h);
            draw(&sim, &mut buf);
            buf.render(&mut Vec::new()).unwrap();
        }
    }

    #[test]
    fn test_render_emits_half_blocks() {
        let mut buf = PixelBuf::new(4, 4);
        buf.set(0, 0, WHITE);
        let mut out = Vec::new();
        buf.render(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('\u{2580}'));
        assert!(text.contains("\r\n"));
    }

    #[test]
    fn test_resize() {
        let mut buf = PixelBuf::for_terminal(10, 5);
        assert_eq!((buf.width(), buf.height()), (10, 10));
        buf.resize(20, 8);
        assert_eq!((buf.width(), buf.height()), (20, 8));
        buf.set(19, 7, WHITE);
        assert_eq!(buf.get(19, 7), WHITE);
    }

    #[test]
    fn test_score_drawn_larger_than_best() {
        let count = |buf: &PixelBuf, c: Rgb| {
            (0..buf.height())
                .flat_map(|y| (0..buf.width()).map(move |x| (x, y)))
                .filter(|&(x, y)| buf.get(x, y) == c)
                .count()
        };
        let mut small = PixelBuf::new(40, 20);
        draw_number(&mut small, 20, 2, 8, 1, WHITE);
        let mut large = PixelBuf::new(40, 20);
        draw_number(&mut large, 20, 2, 8, 2, WHITE);
        assert_eq!(count(&small, WHITE), 13);
        assert_eq!(count(&large, WHITE), 52);
    }

    #[test]
    fn test_pipe_shade_edges() {
        assert_eq!(pipe_shade(0, 1), PIPE_M);
        assert_eq!(pipe_shade(0, 10), PIPE_L);
    }
}
