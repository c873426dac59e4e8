//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del servidor de referencia y del
//! cliente HTTP, leída de variables de entorno.

pub mod environment;

pub use environment::*;
