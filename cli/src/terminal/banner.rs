use colored::*;

use crate::terminal::print;

const BANNER_0: &str = r#"
            _    ____  ____   ____    _    _   _
           / \  |  _ \/ ___| / ___|  / \  | \ | |
          / _ \ | |_) \___ \| |     / _ \ |  \| |
         / ___ \|  __/ ___) | |___ / ___ \| |\  |
        /_/   \_\_|   |____/ \____/_/   \_\_| \_|
"#;

const BANNER_1: &str = r#"
                     .-"""-.
                    /  .-.  \        ((( o )))
                   |  (   )  |          |
                    \  `-'  /           |
                     `-...-'        ____|____
"#;

const BANNER_2: &str = r#"
          ___       ___       ___       ___       ___       ___
         /\  \     /\  \     /\  \     /\  \     /\  \     /\__\
        /::\  \   /::\  \   /::\  \   /::\  \   /::\  \   /:| _|_
       /::\:\__\ /::\:\__\ /\:\:\__\ /:/\:\__\ /::\:\__\ /::|/\__\
       \/\::/  / \/\::/  / \:\:\/__/ \:\ \/__/ \/\::/  / \/|::/  /
         /:/  /     \/__/   \::/  /   \:\__\     /:/  /    |:/  /
         \/__/               \/__/     \/__/     \/__/     \/__/
"#;

/// Prints one of the banners at random.
pub fn print() {
    let n: u8 = rand::random_range(0..=2);
    let art: ColoredString = match n {
        0 => BANNER_0.green(),
        1 => BANNER_1.truecolor(255, 165, 0),
        _ => BANNER_2.blue(),
    };
    print::print(&format!("{art}"));
}
