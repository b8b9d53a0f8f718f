use crate::cfg;
use crate::systems::camera::Camera;
use tcod::{colors, console, Console as _};

pub fn put_world_char(
    con: &mut impl console::Console,
    camera: &Camera,
    (x, y): (f32, f32),
    glyph: char,
    color: colors::Color,
) {
    let cell = camera.to_cell(x, y);
    if camera.is_on_screen(cell) {
        con.set_default_foreground(color);
        con.put_char(cell.0, cell.1, glyph, console::BackgroundFlag::None);
    }
}

/// Paints the cells covered by a rectangle of map pixels.
pub fn fill_world_rect(
    con: &mut impl console::Console,
    camera: &Camera,
    (x, y): (f32, f32),
    (width, height): (f32, f32),
    color: colors::Color,
) {
    let (left, top) = camera.to_cell(x, y);
    let (right, bottom) = camera.to_cell(x + width - 1.0, y + height - 1.0);
    for cy in top.max(0)..=bottom.min(cfg::SCREEN_HEIGHT - 1) {
        for cx in left.max(0)..=right.min(cfg::SCREEN_WIDTH - 1) {
            con.set_char_background(cx, cy, color, console::BackgroundFlag::Set);
        }
    }
}

pub fn render_bar(
    panel: &mut impl console::Console,
    x: i32,
    y: i32,
    total_width: i32,
    name: &str,
    value: i32,
    maximum: i32,
    bar_color: colors::Color,
    back_color: colors::Color,
) {
    let bar_width = if maximum > 0 {
        (value as f32 / maximum as f32 * total_width as f32) as i32
    } else {
        0
    };
    // background first, then the bar on top
    panel.set_default_background(back_color);
    panel.rect(x, y, total_width, 1, false, console::BackgroundFlag::Set);
    panel.set_default_background(bar_color);
    if bar_width > 0 {
        panel.rect(x, y, bar_width, 1, false, console::BackgroundFlag::Set);
    }
    panel.set_default_foreground(cfg::COLOR_LIGHTEST_GREY);
    panel.print_ex(
        x + total_width / 2,
        y,
        console::BackgroundFlag::None,
        console::TextAlignment::Center,
        &format!("{}: {}/{}", name, value, maximum),
    );
}

pub fn render_box(
    con: &mut impl console::Console,
    (x, y): (i32, i32),
    (width, height): (i32, i32),
    back_color: colors::Color,
) {
    con.set_default_background(back_color);
    con.rect(x, y, width, height, true, console::BackgroundFlag::Set);
}

/// A centered box with an optional header and one line per choice, the
/// current one being marked.
pub fn render_menu(
    destination: &mut impl console::Console,
    header: &str,
    choices: &[String],
    current: usize,
    width: i32,
) {
    let header_height = if header.is_empty() {
        -1
    } else {
        destination.get_height_rect(0, 0, width - 2, cfg::SCREEN_HEIGHT - 2, header)
    };
    let lines: i32 = choices
        .iter()
        .map(|choice| choice.lines().count().max(1) as i32)
        .sum();
    let height = header_height + lines + 3;
    let mut window = console::Offscreen::new(width, height);
    window.set_default_background(cfg::COLOR_DARK_SKY);
    window.set_default_foreground(cfg::COLOR_DARKER_SEPIA);
    window.clear();
    window.print_rect(1, 1, width - 2, height, header);
    let mut y = header_height + 2;
    for (index, choice) in choices.iter().enumerate() {
        let marker = if index == current { '>' } else { ' ' };
        for (line_number, line) in choice.lines().enumerate() {
            let prefix = if line_number == 0 { marker } else { ' ' };
            window.print(1, y, format!("{} {}", prefix, line));
            y += 1;
        }
    }
    let x = cfg::SCREEN_WIDTH / 2 - width / 2;
    let y = cfg::SCREEN_HEIGHT / 2 - height / 2;
    console::blit(&window, (0, 0), (width, height), destination, (x, y), 1.0, 1.0);
}
