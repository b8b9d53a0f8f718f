use tcod::colors;

// actual size of the window, in cells of a 16px font
pub const SCREEN_WIDTH: i32 = 64;
pub const SCREEN_HEIGHT: i32 = 36;

// map pixels per console cell
pub const CELL_SIZE: f32 = 32.0;

pub const LIMIT_FPS: i32 = 60;

// pixels to physics units
pub const PHYSICS_SCALE: f32 = 0.02;

pub const GRID_UNIT: u32 = 1600;

// hero
pub const HERO_HOP: f32 = 150.0;
pub const HERO_TURN: f32 = 3.0;
pub const HERO_WIDTH: f32 = 60.0;
pub const HERO_HEIGHT: f32 = 55.0;
pub const HERO_START: (f32, f32) = (100.0, 100.0);
pub const INITIAL_HP: i32 = 75;
pub const INITIAL_MAX_HP: i32 = 100;
pub const INITIAL_MP: i32 = 50;
pub const INITIAL_MAX_MP: i32 = 100;

// characters
pub const CHARACTER_WIDTH: f32 = 60.0;
pub const CHARACTER_HEIGHT: f32 = 45.0;
pub const DIALOG_DISTANCE: f32 = 100.0;

// shrines
pub const SHRINE_DISTANCE: f32 = 70.0;
pub const SHRINE_PARTICLES: usize = 20;
pub const SHRINE_AMPLITUDE: f32 = 30.0;
pub const PONA_HEAL_RATIO: f32 = 0.1;

// save slots
pub const SLOT_COUNT: usize = 3;
pub const SAVE_MESSAGE_TIME: f32 = 2.0;

// sizes and coordinates relevant for the GUI
pub const BAR_WIDTH: i32 = 20;
pub const DIALOG_WIDTH: i32 = 48;
pub const DIALOG_HEIGHT: i32 = 7;
pub const DIALOG_PADDING: i32 = 1;
pub const DIALOG_Y: i32 = SCREEN_HEIGHT - DIALOG_HEIGHT - 1;
pub const SPEAKER_WIDTH: i32 = 16;
pub const SPEAKER_HEIGHT: i32 = 1;
pub const MESSAGE_WIDTH: i32 = 40;
pub const MENU_WIDTH: i32 = 24;

// colors:
pub const COLOR_LIGHTEST_GREY: colors::Color = colors::Color::new(192, 209, 204);
pub const COLOR_DARKEST_GREY: colors::Color = colors::Color::new(20, 24, 23);
pub const COLOR_SEPIA: colors::Color = colors::Color::new(129, 122, 119);
pub const COLOR_DARK_SEPIA: colors::Color = colors::Color::new(92, 87, 82);
pub const COLOR_DARKER_SEPIA: colors::Color = colors::Color::new(53, 50, 56);
pub const COLOR_LIGHT_SKY: colors::Color = colors::Color::new(165, 195, 214);
pub const COLOR_DARK_SKY: colors::Color = colors::Color::new(104, 127, 139);
pub const COLOR_GREEN: colors::Color = colors::Color::new(79, 119, 84);
pub const COLOR_DARK_RED: colors::Color = colors::Color::new(127, 78, 77);
pub const COLOR_ORANGE: colors::Color = colors::Color::new(155, 107, 77);

pub const COLOR_HP: colors::Color = COLOR_DARK_RED;
pub const COLOR_MP: colors::Color = COLOR_DARK_SKY;
pub const COLOR_BAR_BG: colors::Color = COLOR_DARKER_SEPIA;
pub const COLOR_HERO: colors::Color = COLOR_LIGHTEST_GREY;
pub const COLOR_CHARACTER: colors::Color = COLOR_ORANGE;
pub const COLOR_SPRITE: colors::Color = COLOR_GREEN;

// tile palette, picked by local tile id
pub const TILE_PALETTE: [colors::Color; 4] = [
    COLOR_DARKER_SEPIA,
    COLOR_DARK_SEPIA,
    COLOR_SEPIA,
    COLOR_GREEN,
];
