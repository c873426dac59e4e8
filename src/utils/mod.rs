//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y para la cookie
//! de sesión firmada con JWT.

pub mod errors;
pub mod jwt;
