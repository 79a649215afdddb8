use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

use crate::backdrop::Backdrop;
use crate::config::Config;
use crate::deck::Deck;
use crate::nav::keymap::Key;
use crate::nav::tracker::VisibilityReport;
use crate::nav::views::Thumb;
use crate::nav::{KeyDisposition, Navigator, ScrollStyle, WheelDisposition};
use crate::theme::Theme;

/// Wheel events reported in lines are scaled to this many points each.
const WHEEL_LINE_POINTS: f32 = 40.0;
/// File events inside this window collapse into one reload.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(250);

/// Keys the engine understands, in egui terms. Everything else stays
/// with the shell or the platform.
const KEYMAP: [(egui::Key, Key); 12] = [
    (egui::Key::ArrowDown, Key::ArrowDown),
    (egui::Key::ArrowUp, Key::ArrowUp),
    (egui::Key::PageDown, Key::PageDown),
    (egui::Key::PageUp, Key::PageUp),
    (egui::Key::Home, Key::Home),
    (egui::Key::End, Key::End),
    (egui::Key::Space, Key::Space),
    (egui::Key::Enter, Key::Enter),
    (egui::Key::Escape, Key::Escape),
    (egui::Key::O, Key::Char('o')),
    (egui::Key::N, Key::Char('n')),
    (egui::Key::P, Key::Char('p')),
];

struct DeckApp {
    file_path: PathBuf,
    nav: Navigator,
    theme: Theme,
    /// Base URL for the deep-link readout, from `--link`.
    link_base: Option<String>,
    backdrop: Backdrop,
    /// Animated position of the slide strip, in points from its top.
    scroll_offset: f32,
    scroll_target: f32,
    /// Current animated scroll position in the overview grid
    grid_scroll_offset: f32,
    /// Target scroll position in the overview grid
    grid_scroll_target: f32,
    /// Which overview card the mouse is hovering over
    hover_slide: Option<usize>,
    /// Whether to show hover effect (false when keyboard took over)
    use_hover: bool,
    /// Last known hover position, used to detect actual mouse movement
    last_hover_pos: Option<egui::Pos2>,
    /// First finger down, with its last known y position
    active_touch: Option<(egui::TouchId, f32)>,
    show_hud: bool,
    toast: Option<Toast>,
    last_ctrl_c: Option<Instant>,
    last_esc: Option<Instant>,
    frame_count: u32,
    fps: f32,
    fps_update: Instant,
    reload_rx: Option<mpsc::Receiver<()>>,
    _watcher: Option<Debouncer<RecommendedWatcher>>,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.4;
        let fade_start = 1.1;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.4
    }
}

impl DeckApp {
    fn new(file: PathBuf, nav: Navigator, link_base: Option<String>) -> Self {
        // The manifest wins over the config default
        let config = Config::load_or_default();
        let theme_name = nav
            .deck()
            .meta
            .theme
            .clone()
            .or_else(|| config.defaults.as_ref().and_then(|d| d.theme.clone()));
        let theme = Theme::from_name(theme_name.as_deref().unwrap_or("dark"));

        let (watcher, reload_rx) = match spawn_watcher(&file) {
            Some((watcher, rx)) => (Some(watcher), Some(rx)),
            None => (None, None),
        };

        let now = Instant::now();
        Self {
            file_path: file,
            nav,
            theme,
            link_base,
            backdrop: Backdrop::new(),
            scroll_offset: 0.0,
            scroll_target: 0.0,
            grid_scroll_offset: 0.0,
            grid_scroll_target: 0.0,
            hover_slide: None,
            use_hover: false,
            last_hover_pos: None,
            active_touch: None,
            show_hud: false,
            toast: None,
            last_ctrl_c: None,
            last_esc: None,
            frame_count: 0,
            fps: 0.0,
            fps_update: now,
            reload_rx,
            _watcher: watcher,
        }
    }

    fn display_title(&self) -> String {
        self.nav.deck().meta.title.clone().unwrap_or_else(|| {
            self.file_path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string()
        })
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let elapsed = self.fps_update.elapsed().as_secs_f32();
        if elapsed >= 0.5 {
            self.fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.fps_update = Instant::now();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    /// The shareable address of the current slide: the `--link` base
    /// if one was given, plus the live fragment.
    fn current_link(&self) -> String {
        let fragment = self
            .nav
            .views()
            .fragment
            .as_ref()
            .map(|f| f.value().to_string())
            .unwrap_or_default();
        match &self.link_base {
            Some(base) => format!("{base}{fragment}"),
            None => fragment,
        }
    }

    fn copy_link(&mut self, ctx: &egui::Context) {
        ctx.copy_text(self.current_link());
        self.toast = Some(Toast::new("Link copied".to_string()));
    }

    /// Re-read the manifest after the watcher fires. The fragment
    /// carries the position into the rebuilt deck; a broken manifest
    /// keeps the old deck on screen.
    fn reload_deck(&mut self) {
        match Deck::load(&self.file_path) {
            Ok(deck) => {
                let fragment = self
                    .nav
                    .views()
                    .fragment
                    .as_ref()
                    .map(|f| f.value().to_string());
                let mut nav = Navigator::new(deck);
                nav.startup(fragment.as_deref());
                self.nav = nav;
                if let Some(name) = self.nav.deck().meta.theme.as_deref() {
                    self.theme = Theme::from_name(name);
                }
                self.toast = Some(Toast::new(format!(
                    "Reloaded {}",
                    self.file_path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                )));
            }
            Err(e) => {
                warn!("reload: {e:#}");
                self.toast = Some(Toast::new(format!("Reload failed: {e}")));
            }
        }
    }

    /// Scroll a pass-through wheel or touch delta. Positive moves down
    /// the page. Clamped at render time when the overflow is known.
    fn free_scroll(&mut self, downward: f32) {
        if self.nav.panels().overview_open() {
            self.grid_scroll_target += downward;
        } else {
            self.scroll_target += downward;
        }
    }

    fn handle_touch(
        &mut self,
        id: egui::TouchId,
        phase: egui::TouchPhase,
        pos: egui::Pos2,
        now: Instant,
    ) {
        match phase {
            egui::TouchPhase::Start => {
                // First finger only; extra fingers never steal the gesture
                if self.active_touch.is_none() {
                    self.active_touch = Some((id, pos.y));
                    self.nav.on_touch_start(pos.y, now);
                }
            }
            egui::TouchPhase::Move => {
                if let Some((active, last_y)) = self.active_touch {
                    if active == id {
                        // The strip follows the finger while the gesture runs
                        self.free_scroll(last_y - pos.y);
                        self.active_touch = Some((active, pos.y));
                    }
                }
            }
            egui::TouchPhase::End => {
                if self.active_touch.map(|(active, _)| active) == Some(id) {
                    self.active_touch = None;
                    self.nav.on_touch_end(pos.y, now);
                }
            }
            egui::TouchPhase::Cancel => {
                if self.active_touch.map(|(active, _)| active) == Some(id) {
                    self.active_touch = None;
                    self.nav.on_touch_cancel();
                }
            }
        }
    }

    fn grid_columns(&self) -> usize {
        let count = self.nav.deck().len();
        if count <= 4 {
            2
        } else if count <= 9 {
            3
        } else {
            4
        }
    }

    fn grid_cell_rect(&self, index: usize, rect: egui::Rect, scale: f32, scroll: f32) -> egui::Rect {
        let cols = self.grid_columns();
        let padding = 24.0 * scale;
        let gap = 16.0 * scale;
        let grid_top = rect.top() + padding + 40.0 * scale;
        let cell_w = (rect.width() - padding * 2.0 - gap * (cols as f32 - 1.0)) / cols as f32;
        let cell_h = cell_w * 9.0 / 16.0;
        let row = index / cols;
        let col = index % cols;
        egui::Rect::from_min_size(
            egui::pos2(
                rect.left() + padding + col as f32 * (cell_w + gap),
                grid_top + row as f32 * (cell_h + gap) - scroll,
            ),
            egui::vec2(cell_w, cell_h),
        )
    }

    fn grid_content_height(&self, rect: egui::Rect, scale: f32) -> f32 {
        let count = self.nav.deck().len();
        let cols = self.grid_columns();
        let rows = count.div_ceil(cols);
        let padding = 24.0 * scale;
        let gap = 16.0 * scale;
        let cell_w = (rect.width() - padding * 2.0 - gap * (cols as f32 - 1.0)) / cols as f32;
        let cell_h = cell_w * 9.0 / 16.0;
        rows as f32 * (cell_h + gap) - gap
    }

    fn grid_available_height(&self, rect: egui::Rect, scale: f32) -> f32 {
        let padding = 24.0 * scale;
        rect.height() - padding * 2.0 - 40.0 * scale
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        (rect.width() / ref_w).min(rect.height() / ref_h)
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_fps();

        // Manifest changed on disk?
        if let Some(rx) = &self.reload_rx {
            let mut reload = false;
            while rx.try_recv().is_ok() {
                reload = true;
            }
            if reload {
                self.reload_deck();
            }
        }

        let now = Instant::now();
        let page_h = ctx.screen_rect().height();

        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut copy_link = false;

        ctx.input(|i| {
            // Quit: Q from anywhere
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }

            // Ctrl+C double-tap to quit
            if i.modifiers.ctrl && i.key_pressed(egui::Key::C) {
                if let Some(last) = self.last_ctrl_c {
                    if last.elapsed().as_secs_f32() < 1.0 {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_ctrl_c = Some(Instant::now());
                self.toast = Some(Toast::new("Press Ctrl+C again to quit".to_string()));
                return;
            }

            // Fullscreen toggle: F
            if i.key_pressed(egui::Key::F) {
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                    !i.viewport().fullscreen.unwrap_or(false),
                ));
                return;
            }

            // Theme toggle: D
            if i.key_pressed(egui::Key::D) {
                self.toggle_theme();
                return;
            }

            // Copy deep link: C (clipboard write deferred, same as above)
            if i.key_pressed(egui::Key::C) {
                copy_link = true;
                return;
            }

            // Toggle HUD: H
            if i.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
                return;
            }

            // Everything the engine understands goes through it; an
            // unclaimed Escape falls back to the double-tap quit.
            for (source, key) in KEYMAP {
                if !i.key_pressed(source) {
                    continue;
                }
                match self.nav.on_key(key) {
                    KeyDisposition::Consumed => {}
                    KeyDisposition::Pass => {
                        if key == Key::Escape {
                            if let Some(last) = self.last_esc {
                                if last.elapsed().as_secs_f32() < 1.0 {
                                    viewport_cmds.push(egui::ViewportCommand::Close);
                                    continue;
                                }
                            }
                            self.last_esc = Some(Instant::now());
                            self.toast = Some(Toast::new("Press Esc again to exit".to_string()));
                        }
                    }
                }
            }

            // Wheel and touch need per-event deltas, not the merged
            // frame total, so the gate can judge each one
            for event in &i.events {
                match event {
                    egui::Event::MouseWheel { unit, delta, .. } => {
                        let points = match unit {
                            egui::MouseWheelUnit::Point => delta.y,
                            egui::MouseWheelUnit::Line => delta.y * WHEEL_LINE_POINTS,
                            egui::MouseWheelUnit::Page => delta.y * page_h,
                        };
                        // egui counts scroll-up as positive; the gate
                        // counts points travelled down the page
                        let downward = -points;
                        match self.nav.on_wheel(downward, now) {
                            WheelDisposition::PassThrough => self.free_scroll(downward),
                            WheelDisposition::Consumed | WheelDisposition::Navigated => {}
                        }
                    }
                    egui::Event::Touch { id, phase, pos, .. } => {
                        self.handle_touch(*id, *phase, *pos, now);
                    }
                    _ => {}
                }
            }
        });

        // Send collected viewport commands outside the input closure
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        if copy_link {
            self.copy_link(ctx);
        }

        // Execute whatever the engine decided this frame
        let len = self.nav.deck().len();
        if let Some(request) = self.nav.take_scroll_request() {
            self.scroll_target = request.index as f32 * page_h;
            if request.style == ScrollStyle::Instant {
                self.scroll_offset = self.scroll_target;
            }
        }

        // Clamp target, then animate: move 15% of the remaining
        // distance each frame
        let max_scroll = page_h * len.saturating_sub(1) as f32;
        self.scroll_target = self.scroll_target.clamp(0.0, max_scroll);
        let diff = self.scroll_target - self.scroll_offset;
        if diff.abs() < 0.5 {
            self.scroll_offset = self.scroll_target;
        } else {
            self.scroll_offset += diff * 0.15;
            ctx.request_repaint();
        }

        // Tell the engine what is actually on screen now
        if page_h > 0.0 {
            let reports: Vec<VisibilityReport> = (0..len)
                .map(|index| {
                    let top = index as f32 * page_h - self.scroll_offset;
                    let visible = (top + page_h).min(page_h) - top.max(0.0);
                    VisibilityReport::new(index, (visible / page_h).max(0.0))
                })
                .collect();
            self.nav.observe_visibility(&reports);
        }

        // Expire toast
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);

                let scale = Self::compute_scale(rect);

                let pointer = ctx.input(|i| i.pointer.hover_pos());
                self.backdrop.paint(ui.painter(), rect, pointer, &self.theme);

                if self.nav.panels().overview_open() {
                    self.draw_overview(ui, ctx, rect, scale);
                } else {
                    self.draw_strip(ui, rect, scale);
                    if !self.nav.presenting() {
                        self.draw_chrome(ui, ctx, rect, scale);
                    }
                    if self.nav.panels().notes_open() {
                        self.draw_notes(ui, rect, scale);
                    }
                }

                // Toast notification (shown over everything)
                if let Some(ref toast) = self.toast {
                    let opacity = toast.opacity();
                    if opacity > 0.0 {
                        let toast_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
                        let toast_bg =
                            Theme::with_opacity(self.theme.panel_background, opacity * 0.9);
                        let galley = ui.painter().layout_no_wrap(
                            toast.message.clone(),
                            egui::FontId::proportional(20.0 * scale),
                            toast_color,
                        );
                        let padding = 16.0 * scale;
                        let toast_rect = egui::Rect::from_min_size(
                            egui::pos2(
                                rect.center().x - galley.rect.width() / 2.0 - padding,
                                rect.bottom() - 80.0 * scale,
                            ),
                            egui::vec2(
                                galley.rect.width() + padding * 2.0,
                                galley.rect.height() + padding * 2.0,
                            ),
                        );
                        ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
                        let text_pos =
                            egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
                        ui.painter().galley(text_pos, galley, toast_color);
                        ctx.request_repaint();
                    }
                }

                // HUD overlay
                if self.show_hud && !self.nav.panels().overview_open() {
                    draw_hud(ui, &self.theme, rect, scale);
                }

                // The particles drift even when nothing else animates
                ctx.request_repaint_after(Duration::from_millis(16));
            });
    }
}

impl DeckApp {
    fn draw_strip(&self, ui: &mut egui::Ui, rect: egui::Rect, scale: f32) {
        let len = self.nav.deck().len();
        let page_h = rect.height();

        // Render slides inside a clipped child UI so neighbours don't bleed
        let strip = ui.new_child(egui::UiBuilder::new().max_rect(rect).id_salt("strip_clip"));
        for index in 0..len {
            let top = rect.top() + index as f32 * page_h - self.scroll_offset;
            let slide_rect = egui::Rect::from_min_size(
                egui::pos2(rect.left(), top),
                egui::vec2(rect.width(), page_h),
            );
            if !slide_rect.intersects(rect) {
                continue;
            }
            self.draw_slide(&strip, index, slide_rect, scale);
        }

        // Fade gradients hint at the neighbouring slides
        let fade_h = 80.0 * scale;
        let max_scroll = page_h * len.saturating_sub(1) as f32;
        if self.scroll_offset > 0.5 {
            draw_fade_gradient(ui, rect, fade_h, &self.theme, true);
        }
        if self.scroll_offset < max_scroll - 0.5 {
            draw_fade_gradient(ui, rect, fade_h, &self.theme, false);
        }
    }

    fn draw_slide(&self, ui: &egui::Ui, index: usize, rect: egui::Rect, scale: f32) {
        let slide = &self.nav.deck().slides[index];
        let margin = rect.width() * 0.14;
        let content_w = rect.width() - margin * 2.0;

        // Ordinal eyebrow above the title
        let ordinal_color = Theme::with_opacity(self.theme.accent, 0.6);
        let ordinal = ui.painter().layout_no_wrap(
            format!("{:02}", index + 1),
            egui::FontId::monospace(self.theme.chrome_size * scale),
            ordinal_color,
        );
        let title_top = rect.top() + rect.height() * 0.26;
        ui.painter().galley(
            egui::pos2(rect.left() + margin, title_top - 28.0 * scale),
            ordinal,
            ordinal_color,
        );

        let title_color = self.theme.heading_color;
        let title = ui.painter().layout(
            slide.display_title(index),
            egui::FontId::proportional(self.theme.title_size * scale),
            title_color,
            content_w,
        );
        let title_h = title.rect.height();
        ui.painter().galley(
            egui::pos2(rect.left() + margin, title_top),
            title,
            title_color,
        );

        if let Some(body) = slide.body.as_deref() {
            let body_color = Theme::with_opacity(self.theme.foreground, 0.88);
            let body_galley = ui.painter().layout(
                body.to_string(),
                egui::FontId::proportional(self.theme.body_size * scale),
                body_color,
                content_w,
            );
            ui.painter().galley(
                egui::pos2(rect.left() + margin, title_top + title_h + 32.0 * scale),
                body_galley,
                body_color,
            );
        }
    }

    fn draw_chrome(&mut self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        let views = self.nav.views();
        let progress = views.progress.as_ref().map(|p| p.fraction());
        let dots = views.dots.as_ref().map(|d| (d.active(), d.count()));

        // Progress bar hugs the top edge
        if let Some(fraction) = progress {
            let bar = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * fraction, 3.0 * scale),
            );
            ui.painter()
                .rect_filled(bar, 0.0, Theme::with_opacity(self.theme.accent, 0.85));
        }

        // Dot rail on the right edge, one dot per slide, clickable
        if let Some((active, count)) = dots {
            let spacing = 22.0 * scale;
            let x = rect.right() - 26.0 * scale;
            let top = rect.center().y - (count as f32 - 1.0) * spacing / 2.0;
            let hover_pos = ctx.input(|i| i.pointer.hover_pos());
            let clicked = ctx.input(|i| i.pointer.button_pressed(egui::PointerButton::Primary));
            let mut chosen = None;
            for index in 0..count {
                let center = egui::pos2(x, top + index as f32 * spacing);
                let hovered = hover_pos.is_some_and(|hp| hp.distance(center) < 9.0 * scale);
                let (radius, color) = if index == active {
                    (5.0 * scale, self.theme.accent)
                } else if hovered {
                    (4.5 * scale, Theme::with_opacity(self.theme.foreground, 0.6))
                } else {
                    (3.5 * scale, Theme::with_opacity(self.theme.muted, 0.8))
                };
                ui.painter().circle_filled(center, radius, color);
                if hovered && clicked {
                    chosen = Some(index);
                }
            }
            if let Some(target) = chosen {
                self.nav.go_to(target, ScrollStyle::Smooth);
            }
        }

        // Footer
        if let Some(footer) = self.nav.deck().meta.footer.clone() {
            let footer_color = self.theme.muted;
            let galley = ui.painter().layout_no_wrap(
                footer,
                egui::FontId::proportional(self.theme.chrome_size * scale),
                footer_color,
            );
            let pos = egui::pos2(
                rect.center().x - galley.rect.width() / 2.0,
                rect.bottom() - 30.0 * scale,
            );
            ui.painter().galley(pos, galley, footer_color);
        }

        // Slide counter
        let counter_text = format!("{} / {}", self.nav.current() + 1, self.nav.deck().len());
        let counter_color = self.theme.muted;
        let counter_galley = ui.painter().layout_no_wrap(
            counter_text,
            egui::FontId::monospace(self.theme.chrome_size * scale),
            counter_color,
        );
        let counter_pos = egui::pos2(
            rect.right() - counter_galley.rect.width() - 48.0 * scale,
            rect.bottom() - 30.0 * scale,
        );
        ui.painter()
            .galley(counter_pos, counter_galley, counter_color);

        // Deep-link readout, bottom left
        let link = self.current_link();
        if !link.is_empty() {
            let link_color = self.theme.muted;
            let galley = ui.painter().layout_no_wrap(
                link,
                egui::FontId::monospace(self.theme.chrome_size * scale),
                link_color,
            );
            ui.painter().galley(
                egui::pos2(rect.left() + 16.0 * scale, rect.bottom() - 30.0 * scale),
                galley,
                link_color,
            );
        }

        // FPS overlay
        let fps_text = format!("{:.0} fps", self.fps);
        let fps_color = self.theme.muted;
        let fps_galley = ui.painter().layout_no_wrap(
            fps_text,
            egui::FontId::monospace(self.theme.chrome_size * scale),
            fps_color,
        );
        let fps_pos = egui::pos2(
            rect.right() - fps_galley.rect.width() - 12.0 * scale,
            rect.top() + 10.0 * scale,
        );
        ui.painter().galley(fps_pos, fps_galley, fps_color);
    }

    fn draw_notes(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let Some(notes) = self.nav.views().notes.as_ref() else {
            return;
        };
        let panel_w = (rect.width() * 0.28).clamp(280.0 * scale, 440.0 * scale);
        let panel = egui::Rect::from_min_max(
            egui::pos2(rect.right() - panel_w, rect.top()),
            rect.max,
        );
        ui.painter().rect_filled(
            panel,
            0.0,
            Theme::with_opacity(self.theme.panel_background, 0.94),
        );
        let padding = 24.0 * scale;
        let text_w = panel_w - padding * 2.0;

        let heading_color = Theme::with_opacity(self.theme.heading_color, 0.9);
        let heading = ui.painter().layout(
            notes.heading().to_string(),
            egui::FontId::proportional(20.0 * scale),
            heading_color,
            text_w,
        );
        let heading_h = heading.rect.height();
        ui.painter().galley(
            egui::pos2(panel.left() + padding, panel.top() + padding),
            heading,
            heading_color,
        );

        let body_color = Theme::with_opacity(self.theme.foreground, 0.85);
        let body = ui.painter().layout(
            notes.body().to_string(),
            egui::FontId::proportional(self.theme.notes_size * scale),
            body_color,
            text_w,
        );
        ui.painter().galley(
            egui::pos2(
                panel.left() + padding,
                panel.top() + padding + heading_h + 18.0 * scale,
            ),
            body,
            body_color,
        );

        // Dismiss hint
        let hint_color = self.theme.muted;
        let hint = ui.painter().layout_no_wrap(
            "Press N to close".to_string(),
            egui::FontId::proportional(12.0 * scale),
            hint_color,
        );
        ui.painter().galley(
            egui::pos2(
                panel.right() - padding - hint.rect.width(),
                panel.bottom() - padding - hint.rect.height(),
            ),
            hint,
            hint_color,
        );
    }

    fn draw_overview(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        let thumbs: Vec<Thumb> = self
            .nav
            .views()
            .overview
            .as_ref()
            .map(|o| o.thumbs().to_vec())
            .unwrap_or_default();
        let count = thumbs.len();
        if count == 0 {
            return;
        }
        let selected = self.nav.current();
        let padding = 24.0 * scale;

        // --- Grid scrolling ---
        let content_h = self.grid_content_height(rect, scale);
        let available_h = self.grid_available_height(rect, scale);
        let overflow = (content_h - available_h).max(0.0);

        self.grid_scroll_target = self.grid_scroll_target.clamp(0.0, overflow);

        // Animate scroll
        let diff = self.grid_scroll_target - self.grid_scroll_offset;
        if diff.abs() < 0.5 {
            self.grid_scroll_offset = self.grid_scroll_target;
        } else {
            self.grid_scroll_offset += diff * 0.15;
            ctx.request_repaint();
        }
        let scroll = self.grid_scroll_offset;

        // --- Mouse hover detection ---
        let hover_pos = ctx.input(|i| i.pointer.hover_pos());
        let mut hovered: Option<usize> = None;
        // Clip area for grid cells (below title, above hint)
        let grid_top = rect.top() + padding + 40.0 * scale;
        let grid_bottom = rect.bottom() - padding;
        let clip_rect = egui::Rect::from_min_max(
            egui::pos2(rect.left(), grid_top),
            egui::pos2(rect.right(), grid_bottom),
        );

        // Detect whether the mouse has actually moved since last frame
        let mouse_moved = match (hover_pos, self.last_hover_pos) {
            (Some(cur), Some(prev)) => cur.distance(prev) > 1.0,
            (Some(_), None) => true,
            _ => false,
        };
        self.last_hover_pos = hover_pos;

        if let Some(hp) = hover_pos {
            for index in 0..count {
                let cell_rect = self.grid_cell_rect(index, rect, scale, scroll);
                let visible = cell_rect.intersects(clip_rect);
                if visible && cell_rect.contains(hp) && clip_rect.contains(hp) {
                    hovered = Some(index);
                    break;
                }
            }
        }
        if hovered.is_some() {
            self.hover_slide = hovered;
            // Only re-enable hover when the mouse has actually moved
            if mouse_moved {
                self.use_hover = true;
            }
        } else if hover_pos.is_some() {
            self.hover_slide = None;
        }

        // --- Mouse click: pick the hovered card ---
        let clicked = ctx.input(|i| i.pointer.button_pressed(egui::PointerButton::Primary));
        if clicked {
            if let Some(target) = self.hover_slide {
                self.nav.choose_from_overview(target);
                return;
            }
        }

        // --- Keep the current card visible when using keyboard ---
        if !self.use_hover && overflow > 0.0 {
            let sel_rect = self.grid_cell_rect(selected, rect, scale, scroll);
            if sel_rect.top() < grid_top {
                self.grid_scroll_target -= grid_top - sel_rect.top() + padding;
                self.grid_scroll_target = self.grid_scroll_target.max(0.0);
            } else if sel_rect.bottom() > grid_bottom {
                self.grid_scroll_target += sel_rect.bottom() - grid_bottom + padding;
                self.grid_scroll_target = self.grid_scroll_target.min(overflow);
            }
        }

        // Title
        let title_color = Theme::with_opacity(self.theme.heading_color, 0.9);
        let title_galley = ui.painter().layout_no_wrap(
            self.display_title(),
            egui::FontId::proportional(24.0 * scale),
            title_color,
        );
        let title_pos = egui::pos2(rect.left() + padding, rect.top() + padding);
        ui.painter().galley(title_pos, title_galley, title_color);

        // Render cards clipped to the grid area
        let grid_child = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(clip_rect)
                .id_salt("grid_clip"),
        );

        for (index, thumb) in thumbs.iter().enumerate() {
            let cell_rect = self.grid_cell_rect(index, rect, scale, scroll);

            // Skip cells entirely outside the visible area
            if !cell_rect.intersects(clip_rect) {
                continue;
            }

            grid_child.painter().rect_filled(
                cell_rect,
                4.0 * scale,
                Theme::with_opacity(self.theme.panel_background, 0.9),
            );

            let inset = 14.0 * scale;

            // Ordinal badge
            let badge_color = Theme::with_opacity(self.theme.accent, 0.8);
            let badge = grid_child.painter().layout_no_wrap(
                thumb.ordinal.clone(),
                egui::FontId::monospace(14.0 * scale),
                badge_color,
            );
            grid_child.painter().galley(
                cell_rect.min + egui::vec2(inset, inset),
                badge,
                badge_color,
            );

            // Card title
            let text_color = Theme::with_opacity(self.theme.foreground, 0.9);
            let card_title = grid_child.painter().layout(
                thumb.title.clone(),
                egui::FontId::proportional(18.0 * scale),
                text_color,
                cell_rect.width() - inset * 2.0,
            );
            grid_child.painter().galley(
                egui::pos2(cell_rect.left() + inset, cell_rect.top() + inset + 26.0 * scale),
                card_title,
                text_color,
            );

            // Hover highlight (subtle glow, distinct from selection)
            if self.use_hover && self.hover_slide == Some(index) && index != selected {
                let hover_color = Theme::with_opacity(self.theme.accent, 0.12);
                grid_child
                    .painter()
                    .rect_filled(cell_rect, 4.0 * scale, hover_color);
                grid_child.painter().rect_stroke(
                    cell_rect.expand(2.0 * scale),
                    4.0 * scale,
                    egui::Stroke::new(2.0 * scale, Theme::with_opacity(self.theme.accent, 0.5)),
                    egui::StrokeKind::Outside,
                );
            }

            // Current-slide border (drawn last so it stays on top)
            if index == selected {
                grid_child.painter().rect_stroke(
                    cell_rect,
                    4.0 * scale,
                    egui::Stroke::new(3.0 * scale, self.theme.accent),
                    egui::StrokeKind::Outside,
                );
            }
        }

        // Fade gradients at screen edges when scrolled
        let fade_h = 60.0 * scale;
        if scroll > 0.5 {
            draw_fade_gradient(ui, rect, fade_h, &self.theme, true);
        }
        if scroll < overflow - 0.5 {
            draw_fade_gradient(ui, rect, fade_h, &self.theme, false);
        }

        // Hint line
        let hint_color = self.theme.muted;
        let hint = ui.painter().layout_no_wrap(
            "Click a card \u{00b7} O or Esc closes".to_string(),
            egui::FontId::proportional(13.0 * scale),
            hint_color,
        );
        let hint_pos = egui::pos2(
            rect.center().x - hint.rect.width() / 2.0,
            rect.bottom() - 20.0 * scale,
        );
        ui.painter().galley(hint_pos, hint, hint_color);
    }
}

fn draw_hud(ui: &egui::Ui, theme: &Theme, rect: egui::Rect, scale: f32) {
    let shortcuts = [
        ("Space / Enter", "Next slide"),
        ("\u{2193} / PageDown", "Next slide"),
        ("\u{2191} / PageUp", "Previous slide"),
        ("Home / End", "First / last slide"),
        ("Wheel / Swipe", "Flick between slides"),
        ("O", "Overview grid"),
        ("N", "Presenter notes"),
        ("P", "Presenting mode"),
        ("C", "Copy deep link"),
        ("D", "Toggle theme"),
        ("F", "Toggle fullscreen"),
        ("H", "Toggle this HUD"),
        ("Esc", "Close panel / \u{00d7}2 exit"),
        ("Q", "Quit"),
    ];

    let bg = Theme::with_opacity(theme.panel_background, 0.9);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let hud_height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let hud_width = 360.0 * scale;

    let hud_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(hud_width, hud_height));

    ui.painter().rect_filled(hud_rect, 12.0 * scale, bg);

    // Title
    let title_galley = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0 * scale),
        Theme::with_opacity(theme.heading_color, 0.9),
    );
    let title_pos = egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding);
    ui.painter().galley(title_pos, title_galley, text_color);

    let mut y = hud_rect.top() + padding + 40.0 * scale;

    for (key, desc) in &shortcuts {
        let key_galley = ui.painter().layout_no_wrap(
            key.to_string(),
            egui::FontId::monospace(15.0 * scale),
            key_color,
        );
        ui.painter().galley(
            egui::pos2(hud_rect.left() + padding, y),
            key_galley,
            key_color,
        );

        let desc_galley = ui.painter().layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        ui.painter().galley(
            egui::pos2(hud_rect.left() + padding + 170.0 * scale, y),
            desc_galley,
            text_color,
        );

        y += line_height;
    }
}

/// Draw a fade gradient at the top or bottom of a rect.
fn draw_fade_gradient(ui: &egui::Ui, rect: egui::Rect, fade_h: f32, theme: &Theme, top: bool) {
    let bg = theme.background;
    let transparent = egui::Color32::from_rgba_unmultiplied(bg.r(), bg.g(), bg.b(), 0);
    let opaque = bg;

    let fade_rect = if top {
        egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.top()),
            egui::pos2(rect.right(), rect.top() + fade_h),
        )
    } else {
        egui::Rect::from_min_max(
            egui::pos2(rect.left(), rect.bottom() - fade_h),
            egui::pos2(rect.right(), rect.bottom()),
        )
    };

    let mut mesh = egui::Mesh::default();
    // Four vertices: top-left, top-right, bottom-left, bottom-right
    let (top_color, bottom_color) = if top {
        (opaque, transparent)
    } else {
        (transparent, opaque)
    };

    mesh.colored_vertex(fade_rect.left_top(), top_color);
    mesh.colored_vertex(fade_rect.right_top(), top_color);
    mesh.colored_vertex(fade_rect.left_bottom(), bottom_color);
    mesh.colored_vertex(fade_rect.right_bottom(), bottom_color);
    // Two triangles: (0,1,2) and (1,3,2)
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);

    ui.painter().add(egui::Shape::mesh(mesh));
}

/// Watch the manifest's directory and signal when the file itself
/// changes. Watching the directory instead of the file survives
/// editors that save by replacing.
fn spawn_watcher(file: &Path) -> Option<(Debouncer<RecommendedWatcher>, mpsc::Receiver<()>)> {
    let watched = file.file_name()?.to_os_string();
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, rx) = mpsc::channel();
    let mut debouncer = match new_debouncer(RELOAD_DEBOUNCE, move |res: DebounceEventResult| {
        if let Ok(events) = res {
            if events
                .iter()
                .any(|e| e.path.file_name() == Some(watched.as_os_str()))
            {
                let _ = tx.send(());
            }
        }
    }) {
        Ok(debouncer) => debouncer,
        Err(e) => {
            warn!("watch: {e}");
            return None;
        }
    };

    if let Err(e) = debouncer
        .watcher()
        .watch(&dir, RecursiveMode::NonRecursive)
    {
        warn!("watch: {e}");
        return None;
    }

    debug!("watch: {}", dir.display());
    Some((debouncer, rx))
}

pub fn run(
    file: PathBuf,
    windowed: bool,
    start_slide: Option<usize>,
    link: Option<String>,
) -> anyhow::Result<()> {
    let deck = Deck::load(&file)?;

    let title = deck.meta.title.clone().unwrap_or_else(|| {
        format!(
            "scrolldeck \u{2014} {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        )
    });

    // Determine the start position: CLI flags override config
    let config = Config::load_or_default();
    let config_start = config
        .defaults
        .as_ref()
        .and_then(|d| d.start_mode.as_deref());

    let link_fragment = link
        .as_deref()
        .and_then(|l| l.split_once('#'))
        .map(|(_, fragment)| fragment.to_string());
    let link_base = link.as_deref().map(|l| match l.split_once('#') {
        Some((base, _)) => base.to_string(),
        None => l.to_string(),
    });

    let (start_index, start_overview) = if let Some(s) = start_slide {
        // --slide N flag (1-indexed)
        (Some(s.saturating_sub(1)), false)
    } else {
        match config_start {
            Some("overview") => (None, true),
            Some("first") | None => (None, false),
            Some(n) => (n.parse::<usize>().ok().map(|v| v.saturating_sub(1)), false),
        }
    };

    let mut nav = Navigator::new(deck);
    if let Some(fragment) = link_fragment.as_deref() {
        // A deep link wins over everything else
        nav.startup(Some(fragment));
    } else {
        nav.startup(None);
        if let Some(index) = start_index {
            nav.go_to(index, ScrollStyle::Instant);
        }
    }
    if start_overview {
        nav.toggle_overview(Some(true));
    }

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(DeckApp::new(file, nav, link_base)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
