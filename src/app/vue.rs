// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Barre des modes : menu, angle, affichage complexe, S<->D
// - Clavier : Enter évalue, Backspace efface (quand le champ est focus)
// - Menu Équation : champs de coefficients, la session résout
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use calculatrice_sci::noyau::{AngleMode, Menu, ModeComplexe, ModeNumerique};

use super::etat::{AppCalc, TypeEquation, ORDRE_MAX, ORDRE_MIN};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice scientifique");
                ui.add_space(6.0);

                self.ui_modes(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                if self.session.menu() == Menu::Equation {
                    self.ui_equation(ui);
                } else {
                    self.ui_entree(ui);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    /* ------------------------ Modes ------------------------ */

    fn ui_modes(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let mut menu = self.session.menu();
            egui::ComboBox::from_label("Menu")
                .selected_text(menu.libelle())
                .show_ui(ui, |ui| {
                    for m in Menu::TOUS {
                        ui.selectable_value(&mut menu, m, m.libelle());
                    }
                });
            if menu != self.session.menu() {
                self.session.set_menu(menu);
                self.clear_resultats();
            }

            let mut angle = self.session.angle_mode();
            egui::ComboBox::from_label("Angle")
                .selected_text(angle.libelle())
                .show_ui(ui, |ui| {
                    for a in AngleMode::TOUS {
                        ui.selectable_value(&mut angle, a, a.libelle());
                    }
                });
            if angle != self.session.angle_mode() {
                self.session.set_angle_mode(angle);
            }

            if self.session.menu() == Menu::Complexe {
                let mut complexe = self.session.complex_display_mode();
                egui::ComboBox::from_label("Affichage")
                    .selected_text(complexe.libelle())
                    .show_ui(ui, |ui| {
                        for c in ModeComplexe::TOUS {
                            ui.selectable_value(&mut complexe, c, c.libelle());
                        }
                    });
                if complexe != self.session.complex_display_mode() {
                    self.session.set_complex_display_mode(complexe);
                }
            }

            // S<->D : bascule + ré-affiche Ans
            let libelle = match self.session.numeric_display_mode() {
                ModeNumerique::Exact => "S→D",
                ModeNumerique::Decimal => "D→S",
            };
            let resp = ui
                .add_sized([56.0, 24.0], egui::Button::new(libelle))
                .on_hover_text("Bascule Exact / Décimal");
            if resp.clicked() {
                if let Some(s) = self.session.toggle_numeric_display() {
                    self.affichage = s;
                    self.erreur.clear();
                }
                self.focus_entree = true;
            }
        });
    }

    /* ------------------------ Entrée (Calcul / Complexe) ------------------------ */

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 2+3*4, sin30, sqrt2/2, 10∠90")
                .id_salt("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué un bouton, on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Enter évalue (seulement si le champ est focus) ---
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_session();
        }

        ui.add_space(6.0);

        // Actions
        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface affichage + erreur", Action::ClearResultats);
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);
            self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
        });

        ui.add_space(8.0);

        // Touches rapides + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "-", "-", InsertKind::Op);
            self.bouton_insert(ui, "×", "*", InsertKind::Op);
            self.bouton_insert(ui, "÷", "/", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "π", "pi", InsertKind::Word);
            self.bouton_insert(ui, "√", "sqrt(", InsertKind::Func);
            self.bouton_insert(ui, "sin", "sin(", InsertKind::Func);
            self.bouton_insert(ui, "cos", "cos(", InsertKind::Func);
            self.bouton_insert(ui, "tan", "tan(", InsertKind::Func);
            self.bouton_insert(ui, "log", "log(", InsertKind::Func);
            self.bouton_insert(ui, "Ans", "ans", InsertKind::Word);

            if self.session.menu() == Menu::Complexe {
                ui.separator();
                self.bouton_insert(ui, "i", "i", InsertKind::Suffix);
                self.bouton_insert(ui, "∠", "∠", InsertKind::Op);
            }

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.eval_via_session();
            }
        });

        ui.add_space(8.0);

        // Pavé numérique
        self.ui_pave_numerique(ui);
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique")
            .num_columns(3)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"], ["0", ".", "e"]] {
                    for touche in ligne {
                        self.bouton_insert(ui, touche, touche, InsertKind::Digit);
                    }
                    ui.end_row();
                }
            });
    }

    /// Backspace “intelligent” : retire d’un coup les motifs utiles ("sin(", "ans", etc.).
    fn backspace_entree(&mut self) {
        // Retire espaces finaux
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        // Retire tokens connus
        for pat in ["sqrt(", "sin(", "cos(", "tan(", "log(", "pi", "ans"] {
            if self.entree.ends_with(pat) {
                let garde = self.entree.len() - pat.len();
                self.entree.truncate(garde);
                return;
            }
        }

        // Sinon : un caractère
        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    /* ------------------------ Équation ------------------------ */

    fn ui_equation(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Type")
                .selected_text(self.type_equation.libelle())
                .show_ui(ui, |ui| {
                    for t in [TypeEquation::Polynome, TypeEquation::Systeme] {
                        ui.selectable_value(&mut self.type_equation, t, t.libelle());
                    }
                });

            ui.label("Ordre :");
            let mut ordre = self.ordre;
            let resp = ui.add(egui::DragValue::new(&mut ordre).range(ORDRE_MIN..=ORDRE_MAX));
            if resp.changed() {
                self.set_ordre(ordre);
            }
        });

        ui.add_space(8.0);

        match self.type_equation {
            TypeEquation::Polynome => self.ui_polynome(ui),
            TypeEquation::Systeme => self.ui_systeme(ui),
        }

        ui.add_space(8.0);

        let calc = ui.add_sized([96.0, 32.0], egui::Button::new("Calculer"));
        if calc.clicked() {
            let r = match self.type_equation {
                TypeEquation::Polynome => self.session.submit_polynomial(&self.coefficients),
                TypeEquation::Systeme => self
                    .session
                    .submit_linear_system(&self.matrice, &self.second_membre),
            };
            self.set_resultat(r);
        }
    }

    fn ui_polynome(&mut self, ui: &mut egui::Ui) {
        let degre = self.ordre;
        ui.horizontal_wrapped(|ui| {
            for (i, champ) in self.coefficients.iter_mut().enumerate() {
                ui.add(
                    egui::TextEdit::singleline(champ)
                        .desired_width(48.0)
                        .id_salt(("coef", i)),
                );
                match degre - i {
                    0 => {}
                    1 => {
                        ui.label("x +");
                    }
                    p => {
                        ui.label(format!("x^{p} +"));
                    }
                }
            }
            ui.label("= 0");
        });
    }

    fn ui_systeme(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("systeme_lineaire")
            .spacing([4.0, 6.0])
            .show(ui, |ui| {
                for (i, (ligne, b)) in self
                    .matrice
                    .iter_mut()
                    .zip(self.second_membre.iter_mut())
                    .enumerate()
                {
                    let n = ligne.len();
                    for (j, champ) in ligne.iter_mut().enumerate() {
                        ui.add(
                            egui::TextEdit::singleline(champ)
                                .desired_width(48.0)
                                .id_salt(("a", i, j)),
                        );
                        let signe = if j + 1 < n { "+" } else { "=" };
                        ui.label(format!("x{} {signe}", j + 1));
                    }
                    ui.add(
                        egui::TextEdit::singleline(b)
                            .desired_width(48.0)
                            .id_salt(("b", i)),
                    );
                    ui.end_row();
                }
            });
    }

    /* ------------------------ Résultat + démarche ------------------------ */

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label("Résultat :");
        Self::champ_monospace(ui, "affichage_out", &self.affichage, 2);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        let d = self.session.demarche();
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &d.jetons);
                Self::champ_demarche(ui, "Canonique", "demarche_canonique", &d.canonique);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &d.rpn);
                Self::champ_demarche(ui, "Arbre", "demarche_arbre", &d.arbre);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 1);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    /* ------------------------ Boutons ------------------------ */

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() {
            return;
        }

        match kind {
            InsertKind::CloseParen | InsertKind::Suffix => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func => {
                let last = self.entree.chars().rev().find(|c| !c.is_whitespace());
                if let Some(c) = last {
                    if c.is_ascii_digit() || c.is_ascii_alphabetic() || c == ')' {
                        self.entree.push(' ');
                    }
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(to_insert);
                self.entree.push(' ');
            }
            InsertKind::Digit => {
                // chiffres: pas d’espaces auto
                self.entree.push_str(to_insert);
            }
            InsertKind::Word => {
                // mots: espace si juste avant c’est un chiffre ou ')'
                if !self.entree.ends_with(char::is_whitespace) {
                    let last = self.entree.chars().next_back();
                    if let Some(c) = last {
                        if c.is_ascii_digit() || c == ')' {
                            self.entree.push(' ');
                        }
                    }
                }
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /// Soumet l’entrée à la session, puis dépose affichage/erreur dans l’état UI.
    fn eval_via_session(&mut self) {
        let r = self.session.submit_expression(self.entree.trim());
        self.set_resultat(r);
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    OpenParen,
    CloseParen,
    Suffix,
}
