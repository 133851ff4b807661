// src/config/consts.rs

// Target site
pub const SITE_URL: &str = "https://saitama.rsv.ws-scs.jp/web/";

// Browser session
pub const WEBDRIVER_URL: &str = "http://localhost:9515";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const WINDOW_SIZE: (u32, u32) = (1280, 1200);

// Waits
pub const ELEMENT_WAIT_SECS: u64 = 20;
pub const MENU_WAIT_SECS: u64 = 10;
pub const PAGE_LOAD_SECS: u64 = 60;
pub const POLL_MS: u64 = 250;
pub const SETTLE_MS: u64 = 2_000; // be polite, let menus render

// Scan
pub const DEFAULT_MONTHS: usize = 3;
pub const MAX_MONTHS: usize = 6;
pub const EVENING_SLOT: &str = "19:00";
pub const EVENING_SLOT_LABEL: &str = "19-21時";

// Diagnostics
pub const DEFAULT_SHOT_DIR: &str = "shots";
pub const SHOT_PREFIX: &str = "debug_";

// Mail
pub const SMTP_HOST: &str = "smtp.mail.me.com";
pub const SMTP_PORT: u16 = 587;
pub const SENDER: &str = "badmintonkingdom@icloud.com";
pub const RECIPIENT: &str = "badmintonkingdom@icloud.com";
pub const SUBJECT: &str = "【Kingdom】自動巡回・空き状況報告";
pub const PASSWORD_ENV: &str = "ICLOUD_APP_PASSWORD";
