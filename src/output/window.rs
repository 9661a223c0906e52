use super::OutputSink;
use crate::error::ConfigError;
use crate::pipeline::StopReason;
use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use minifb::{Key, Window, WindowOptions};
use std::time::Duration;

/// On-screen preview window. Pressing the quit key or closing the window stops the run.
pub struct WindowOutput {
    window: Window,
    buffer: Vec<u32>,
    width: u32,
    height: u32,
    quit_key: Key,
}

impl WindowOutput {
    pub fn new(title: &str, width: u32, height: u32, quit_key: char) -> Result<Self> {
        let quit_key = key_for(quit_key)?;
        tracing::info!("Opening preview window {}x{}", width, height);

        let window = Window::new(
            title,
            width as usize,
            height as usize,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|err| anyhow!("{err}"))
        .context("Failed to create preview window")?;

        Ok(Self {
            window,
            buffer: vec![0; (width as usize) * (height as usize)],
            width,
            height,
            quit_key,
        })
    }
}

/// minifb expects 0RGB in the low 24 bits
fn pack_rgb(frame: &RgbImage, buffer: &mut Vec<u32>) {
    buffer.clear();
    buffer.extend(
        frame
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32),
    );
}

/// Map a quit character to the key that produces it
fn key_for(c: char) -> Result<Key, ConfigError> {
    let key = match c.to_ascii_lowercase() {
        'a' => Key::A,
        'b' => Key::B,
        'c' => Key::C,
        'd' => Key::D,
        'e' => Key::E,
        'f' => Key::F,
        'g' => Key::G,
        'h' => Key::H,
        'i' => Key::I,
        'j' => Key::J,
        'k' => Key::K,
        'l' => Key::L,
        'm' => Key::M,
        'n' => Key::N,
        'o' => Key::O,
        'p' => Key::P,
        'q' => Key::Q,
        'r' => Key::R,
        's' => Key::S,
        't' => Key::T,
        'u' => Key::U,
        'v' => Key::V,
        'w' => Key::W,
        'x' => Key::X,
        'y' => Key::Y,
        'z' => Key::Z,
        '0' => Key::Key0,
        '1' => Key::Key1,
        '2' => Key::Key2,
        '3' => Key::Key3,
        '4' => Key::Key4,
        '5' => Key::Key5,
        '6' => Key::Key6,
        '7' => Key::Key7,
        '8' => Key::Key8,
        '9' => Key::Key9,
        _ => return Err(ConfigError::QuitKey(c)),
    };
    Ok(key)
}

impl OutputSink for WindowOutput {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(anyhow!(
                "Frame is {}x{}, window is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            ));
        }
        pack_rgb(frame, &mut self.buffer);

        self.window
            .update_with_buffer(&self.buffer, self.width as usize, self.height as usize)
            .map_err(|err| anyhow!("{err}"))
            .context("Failed to present frame")?;
        Ok(())
    }

    fn poll_stop(&mut self, timeout: Duration) -> Option<StopReason> {
        std::thread::sleep(timeout);
        self.window.update();

        if !self.window.is_open() {
            Some(StopReason::WindowClosed)
        } else if self.window.is_key_down(self.quit_key) {
            Some(StopReason::QuitKey)
        } else {
            None
        }
    }
}
