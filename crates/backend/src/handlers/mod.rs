pub mod a001_falla;
pub mod a002_equipo;
pub mod logs;
