//! Gallery Example - Interactive carousel in the terminal
//!
//! This example demonstrates everything working together:
//! - Autoplay advancing the position on its own
//! - Drag/swipe with the mouse
//! - Arrow keys and dot jumps handled by the host
//! - Reactive redraw through the mount effect
//!
//! Run with: cargo run --example gallery

use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use spark_carousel::{
    active_dot, carousel, current_position, dot_count, drain_autoplay, get_state, mount,
    poll_event, project_frame, reset_carousels, route_event, set_container_width,
    set_viewport_bounds, Bounds, CarouselConfig, CarouselProps, InputEvent,
};

const SLIDES: [&str; 5] = ["Apple", "Banana", "Cherry", "Durian", "Elderberry"];

/// Draw the whole UI. Runs inside the mount effect, so every signal read
/// here re-triggers the draw when it changes.
fn draw(index: usize) -> std::io::Result<()> {
    let mut out = stdout();

    let Some(state) = get_state(index) else {
        return Ok(());
    };
    let config = state.config.get();
    let width = {
        let measured = state.measurements.get().container_width as u16;
        if measured == 0 { 40 } else { measured }
    };

    let current = current_position(index);
    let frame = project_frame(index);
    let dots = dot_count(index);
    let active = active_dot(index);

    let inner = width.saturating_sub(2) as usize;
    let label = format!(
        "{} {} ({}/{}) {}",
        if config.arrows { "<" } else { " " },
        SLIDES.get(current).copied().unwrap_or(""),
        current + 1,
        SLIDES.len(),
        if config.arrows { ">" } else { " " },
    );

    let mut strip = String::new();
    if config.dots {
        for dot in 0..dots {
            strip.push(if dot == active { '*' } else { 'o' });
            strip.push(' ');
        }
    }

    queue!(
        out,
        MoveTo(0, 0),
        Clear(ClearType::CurrentLine),
        Print("spark-carousel gallery")
    )?;
    queue!(
        out,
        MoveTo(0, 1),
        Clear(ClearType::CurrentLine),
        Print(format!("+{}+", "-".repeat(inner)))
    )?;
    queue!(
        out,
        MoveTo(0, 2),
        Clear(ClearType::CurrentLine),
        Print(format!("|{label:^inner$}|"))
    )?;
    queue!(
        out,
        MoveTo(0, 3),
        Clear(ClearType::CurrentLine),
        Print(format!("+{}+", "-".repeat(inner)))
    )?;
    queue!(
        out,
        MoveTo(0, 4),
        Clear(ClearType::CurrentLine),
        Print(format!(
            "{strip} autoplay: {}   x={:.0}",
            if config.auto_play { "on" } else { "off" },
            frame.translate_x
        ))
    )?;
    queue!(
        out,
        MoveTo(0, 5),
        Clear(ClearType::CurrentLine),
        Print("arrows step - 1..5 jump - space autoplay - drag to swipe - q quit")
    )?;

    out.flush()
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    reset_carousels();

    let handle = carousel(CarouselProps {
        id: Some("gallery".to_string()),
        slide_count: SLIDES.len(),
        config: CarouselConfig {
            auto_play: true,
            dots: true,
            arrows: true,
            gap: 2.0,
            ..Default::default()
        },
        ..Default::default()
    });
    let index = handle.index();

    let (term_width, _) = crossterm::terminal::size()?;
    let width = term_width.clamp(20, 64);
    set_container_width(index, width as f32);
    set_viewport_bounds(index, Bounds::new(0, 1, width, 3));

    let mount_handle = mount(move || {
        let _ = draw(index);
    })?;

    // Host-owned loop: pointers route to the carousel, keys stay ours
    while mount_handle.is_running() {
        if let Some(event) = poll_event(Duration::from_millis(16))? {
            if !route_event(&event) {
                match event {
                    InputEvent::Key(key) => match key.code {
                        KeyCode::Left => {
                            handle.previous();
                        }
                        KeyCode::Right => {
                            handle.next();
                        }
                        KeyCode::Char(' ') => {
                            let mut config = handle.config();
                            config.auto_play = !config.auto_play;
                            handle.set_config(config);
                        }
                        KeyCode::Char(c @ '1'..='9') => {
                            if let Some(dot) = c.to_digit(10) {
                                handle.select_dot(dot as usize - 1);
                            }
                        }
                        KeyCode::Char('q') | KeyCode::Esc => mount_handle.stop(),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            mount_handle.stop();
                        }
                        _ => {}
                    },
                    InputEvent::Resize(new_width, _) => {
                        let width = new_width.clamp(20, 64);
                        set_container_width(index, width as f32);
                        set_viewport_bounds(index, Bounds::new(0, 1, width, 3));
                    }
                    _ => {}
                }
            }
        }
        drain_autoplay();
    }

    handle.unmount();
    mount_handle.unmount();

    Ok(())
}
