// src/lib.rs
//
// Calculatrice scientifique — bibliothèque (noyau sans interface).
// Le binaire (src/main.rs) n’ajoute que la coquille egui.

pub mod noyau;
