use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, PickupField, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.products`()
    LoadProducts,
    /// Run `service.recycle_points_near`(...) for the configured location
    LoadRecyclePoints,
    /// Run `service.estimate_carbon`(...) for the typed distance
    EstimateCarbon,
    /// Read the typed path and run `service.classify`(...)
    ClassifyImage,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Delete, Down, Enter, Tab, Up};

    // Global shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() && !app.screen.accepts_text() {
        return Action::Quit;
    }
    match key.code {
        Tab => {
            app.screen = app.screen.next();
            app.error_message = None;
            return Action::None;
        }
        BackTab => {
            app.screen = app.screen.previous();
            app.error_message = None;
            return Action::None;
        }
        _ => {}
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Catalog => match key.code {
            Up | Char('k') => {
                app.product_index = app.product_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.product_index + 1 < app.products.len() {
                    app.product_index += 1;
                }
            }
            Char('r') => action = Action::LoadProducts,
            Enter | Char('a') => app.add_selected_to_cart(),
            Char('+') => app.change_selected_product_quantity(1),
            Char('-') => app.change_selected_product_quantity(-1),
            _ => {}
        },

        Screen::Cart => match key.code {
            Up | Char('k') => {
                app.cart_index = app.cart_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.cart_index + 1 < app.cart.snapshot().line_count {
                    app.cart_index += 1;
                }
            }
            Char('+') => app.change_selected_line_quantity(1),
            Char('-') => app.change_selected_line_quantity(-1),
            Char('d') | Delete => app.remove_selected_line(),
            _ => {}
        },

        Screen::RecyclePoints => match key.code {
            Up | Char('k') => {
                app.point_index = app.point_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.point_index + 1 < app.ranked_points.len() {
                    app.point_index += 1;
                }
            }
            Char('r') => action = Action::LoadRecyclePoints,
            _ => {}
        },

        Screen::Carbon => match key.code {
            Char(character) if is_plain(key) => app.carbon_input.push(character),
            Backspace => {
                app.carbon_input.pop();
            }
            Enter => action = Action::EstimateCarbon,
            _ => {}
        },

        Screen::Pickup => match key.code {
            Up | Down => app.pickup_field = app.pickup_field.next(),
            Enter
                if app.pickup_field == PickupField::Images
                    && !app.pickup_image_input.trim().is_empty() =>
            {
                app.attach_pickup_image();
            }
            Delete => app.remove_last_pickup_image(),
            Enter => {
                app.pickup_confirmation = None;
                match app.schedule_pickup(Local::now().date_naive()) {
                    Ok(()) => app.error_message = None,
                    Err(err) => app.error_message = Some(err.to_string()),
                }
            }
            Backspace => match app.pickup_field {
                PickupField::Address => {
                    app.pickup_address.pop();
                }
                PickupField::Articles => app.pickup_articles /= 10,
                PickupField::DaysAhead => app.pickup_days_ahead /= 10,
                PickupField::Images => {
                    app.pickup_image_input.pop();
                }
            },
            Char(character) if is_plain(key) => match app.pickup_field {
                PickupField::Address => app.pickup_address.push(character),
                PickupField::Articles => {
                    if let Some(digit) = character.to_digit(10) {
                        app.pickup_articles = app
                            .pickup_articles
                            .saturating_mul(10)
                            .saturating_add(digit);
                    }
                }
                PickupField::DaysAhead => {
                    if let Some(digit) = character.to_digit(10) {
                        app.pickup_days_ahead = app
                            .pickup_days_ahead
                            .saturating_mul(10)
                            .saturating_add(u64::from(digit))
                            .min(365);
                    }
                }
                PickupField::Images => app.pickup_image_input.push(character),
            },
            _ => {}
        },

        Screen::Scan => match key.code {
            Char(character) if is_plain(key) => app.scan_input.push(character),
            Backspace => {
                app.scan_input.pop();
            }
            Enter => action = Action::ClassifyImage,
            _ => {}
        },
    }
    action
}

fn is_plain(key: KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT)
}
