use chrono::{Local, Timelike};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::app::{App, PickupField, Screen, directions_url};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: tabs, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let cart_quantity = app.cart.snapshot().total_quantity;
    let titles = Screen::ALL.iter().map(|screen| match screen {
        Screen::Cart => format!("Cart ({cart_quantity})"),
        other => other.title().to_owned(),
    });
    let selected = Screen::ALL
        .iter()
        .position(|screen| *screen == app.screen)
        .unwrap_or(0);
    let header = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("RecycleHub · {}", greeting(Local::now().hour()))),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::Catalog => draw_catalog(frame, app, *content_area),
        Screen::Cart => draw_cart(frame, app, *content_area),
        Screen::RecyclePoints => draw_recycle_points(frame, app, *content_area),
        Screen::Carbon => draw_carbon(frame, app, *content_area),
        Screen::Pickup => draw_pickup(frame, app, *content_area),
        Screen::Scan => draw_scan(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::Catalog => "r load · ↑/↓ move · Enter/a add · +/- quantity · Tab next · q quit",
        Screen::Cart => "↑/↓ move · +/- quantity · d remove · Tab next · q quit",
        Screen::RecyclePoints => "r locate · ↑/↓ move · Tab next · q quit",
        Screen::Carbon => "Type distance (km) · Enter estimate · Tab next · Ctrl-C quit",
        Screen::Pickup => "↑/↓ field · type to edit · Enter attach photo/schedule · Del drop photo · Tab next · Ctrl-C quit",
        Screen::Scan => "Type image path · Enter classify · Tab next · Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_catalog(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = if app.products.is_empty() {
        vec![ListItem::new("No products loaded yet. Press r to fetch the catalog.")]
    } else {
        app.products
            .iter()
            .map(|product| {
                let in_cart = app.cart.quantity_of(&product.id);
                let badge = if in_cart > 0 {
                    format!("  [{in_cart} in cart]")
                } else {
                    String::new()
                };
                ListItem::new(format!("{} · ${}{badge}", product.name, product.unit_price))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Eco-friendly products"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.products.is_empty() {
        state.select(Some(app.product_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_cart(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let snapshot = app.cart.snapshot();
    let title = format!(
        "Cart · {} items · total ${}",
        snapshot.total_quantity, snapshot.total_price
    );

    if snapshot.lines.is_empty() {
        let paragraph = Paragraph::new("Your cart is empty.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = snapshot.lines.iter().enumerate().map(|(idx, line)| {
        let style = if idx == app.cart_index {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(line.name.clone()),
            Cell::from(line.quantity.to_string()),
            Cell::from(format!("${}", line.unit_price)),
            Cell::from(format!("${}", line.line_total())),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Product", "Qty", "Price", "Total"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn draw_recycle_points(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // nearest summary
            Constraint::Min(0),    // ranked list
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [summary_area, list_area] = chunks else {
        return;
    };

    let summary = match &app.nearest {
        Some(nearest) => format!(
            "Nearest: {} ({:.2} km)\n{}",
            nearest.point.name,
            nearest.distance_km,
            directions_url(nearest.point.location)
        ),
        None => "No nearby recycle points found.".to_owned(),
    };
    let summary = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Your location {}", app.user_location)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(summary, *summary_area);

    let nearest_id = app.nearest.as_ref().map(|nearest| &nearest.point.id);
    let items: Vec<ListItem<'_>> = app
        .ranked_points
        .iter()
        .map(|entry| {
            let item = ListItem::new(format!("{:>8.2} km  {}", entry.distance_km, entry.point.name));
            if Some(&entry.point.id) == nearest_id {
                item.style(Style::default().fg(Color::Red))
            } else {
                item.style(Style::default().fg(Color::Green))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Nearby recycle points"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.ranked_points.is_empty() {
        state.select(Some(app.point_index));
    }
    frame.render_stateful_widget(list, *list_area, &mut state);
}

fn draw_carbon(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let result = app.carbon_result.map_or_else(
        || "Enter a distance and press Enter.".to_owned(),
        |estimate| format!("Estimated CO2 emission: {:.3} kg CO2e", estimate.co2e_kg),
    );

    let text = format!(
        "Distance (km): {}\nVehicle: {} ({})\n\n{result}",
        app.carbon_input, app.carbon_config.vehicle_type, app.carbon_config.fuel_type
    );
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Carbon emission estimator"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_pickup(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let marker = |field: PickupField| if app.pickup_field == field { "> " } else { "  " };

    let mut text = format!(
        "{}Address: {}\n{}Articles: {}\n{}Days from today: {}\n{}Photo path: {}\n",
        marker(PickupField::Address),
        app.pickup_address,
        marker(PickupField::Articles),
        app.pickup_articles,
        marker(PickupField::DaysAhead),
        app.pickup_days_ahead,
        marker(PickupField::Images),
        app.pickup_image_input,
    );
    let attached: Vec<String> = app
        .pickup_images
        .iter()
        .enumerate()
        .map(|(idx, image)| format!("    {}. {}\n", idx + 1, image.display()))
        .collect();
    text.push_str(&attached.concat());

    if let Some(confirmation) = &app.pickup_confirmation {
        text.push_str("\nPickup scheduled\n");
        text.push_str(&confirmation.summary());
    }

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Schedule a pickup"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_scan(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let result = app.scan_result.as_ref().map_or_else(
        || "No scan yet.".to_owned(),
        |scan| {
            format!(
                "File: {}\nClassification: {}\nWaste material: {}\nRecyclable: {}\nGuidelines: {}",
                scan.filename,
                scan.classification,
                scan.waste_material,
                if scan.recyclable { "Yes" } else { "No" },
                scan.guidelines
            )
        },
    );

    let paragraph = Paragraph::new(format!("Image path: {}\n\n{result}", app.scan_input))
        .block(Block::default().borders(Borders::ALL).title("Scan waste"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn greeting(hour: u32) -> &'static str {
    match hour {
        0..12 => "Good Morning",
        12..18 => "Good Afternoon",
        _ => "Good Evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_follows_time_of_day() {
        assert_eq!(greeting(7), "Good Morning");
        assert_eq!(greeting(12), "Good Afternoon");
        assert_eq!(greeting(18), "Good Evening");
    }
}
