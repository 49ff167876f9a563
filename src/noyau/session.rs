//! Session de calcul.
//!
//! Rôle : porter l’état long (modes, menu, dernière réponse, démarche) et
//! offrir les opérations de la frontière :
//! - setters de modes (sans effet sur Ans)
//! - `submit_expression` : normalisation -> évaluation -> format
//! - `submit_polynomial` / `submit_linear_system` : solveur direct
//!
//! Contrats :
//! - Ans n’est écrit QUE par une expression évaluée avec succès.
//! - Une erreur ne modifie rien (ni Ans, ni démarche).
//! - Rendu par défaut d’une erreur : "Error" (`Session::afficher`).

use num_complex::Complex64;
use tracing::{info, warn};

use super::equations::{solve_linear_system, solve_polynomial};
use super::erreur::{ErreurCalc, Resultat};
use super::eval::{evaluer_jetons, Domaine};
use super::format::{format, format_racine, format_reel};
use super::jetons::{format_tokens, tokenize};
use super::normalise::normaliser;

/// Rendu générique d’un échec à la frontière.
pub const MARQUEUR_ERREUR: &str = "Error";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleMode {
    #[default]
    Degres,
    Radians,
}

impl AngleMode {
    pub const TOUS: [AngleMode; 2] = [AngleMode::Degres, AngleMode::Radians];

    pub fn libelle(self) -> &'static str {
        match self {
            AngleMode::Degres => "Degrés",
            AngleMode::Radians => "Radians",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeNumerique {
    Decimal,
    #[default]
    Exact,
}

impl ModeNumerique {
    pub fn bascule(self) -> Self {
        match self {
            ModeNumerique::Decimal => ModeNumerique::Exact,
            ModeNumerique::Exact => ModeNumerique::Decimal,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeComplexe {
    #[default]
    Rectangulaire,
    Polaire,
}

impl ModeComplexe {
    pub const TOUS: [ModeComplexe; 2] = [ModeComplexe::Rectangulaire, ModeComplexe::Polaire];

    pub fn libelle(self) -> &'static str {
        match self {
            ModeComplexe::Rectangulaire => "a+bi",
            ModeComplexe::Polaire => "r∠φ",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Menu {
    #[default]
    Calcul,
    Complexe,
    Equation,
}

impl Menu {
    pub const TOUS: [Menu; 3] = [Menu::Calcul, Menu::Complexe, Menu::Equation];

    pub fn libelle(self) -> &'static str {
        match self {
            Menu::Calcul => "Calcul",
            Menu::Complexe => "Complexe",
            Menu::Equation => "Équation",
        }
    }
}

/// Trace de la dernière évaluation (panneau “démarche”).
#[derive(Clone, Default, Debug)]
pub struct Demarche {
    pub jetons: String,
    pub canonique: String,
    pub rpn: String,
    pub arbre: String,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    angle: AngleMode,
    numerique: ModeNumerique,
    complexe: ModeComplexe,
    menu: Menu,
    ans: Option<Complex64>,
    demarche: Demarche,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn angle_mode(&self) -> AngleMode {
        self.angle
    }

    pub fn numeric_display_mode(&self) -> ModeNumerique {
        self.numerique
    }

    pub fn complex_display_mode(&self) -> ModeComplexe {
        self.complexe
    }

    pub fn menu(&self) -> Menu {
        self.menu
    }

    /// Ans (None tant qu’aucune expression n’a réussi).
    pub fn derniere_reponse(&self) -> Option<Complex64> {
        self.ans
    }

    pub fn demarche(&self) -> &Demarche {
        &self.demarche
    }

    /* ------------------------ Modes ------------------------ */

    pub fn set_angle_mode(&mut self, angle: AngleMode) {
        info!(?angle, "mode d’angle");
        self.angle = angle;
    }

    pub fn set_numeric_display_mode(&mut self, numerique: ModeNumerique) {
        info!(?numerique, "affichage numérique");
        self.numerique = numerique;
    }

    pub fn set_complex_display_mode(&mut self, complexe: ModeComplexe) {
        info!(?complexe, "affichage complexe");
        self.complexe = complexe;
    }

    pub fn set_menu(&mut self, menu: Menu) {
        info!(?menu, "menu");
        self.menu = menu;
    }

    /// S<->D : bascule Décimal/Exact et renvoie Ans re-formatée (si elle existe).
    pub fn toggle_numeric_display(&mut self) -> Option<String> {
        self.set_numeric_display_mode(self.numerique.bascule());
        self.ans.map(|z| self.formater(z))
    }

    /// Modes par défaut, Ans et démarche effacées.
    pub fn reset(&mut self) {
        info!("session remise à zéro");
        *self = Self::default();
    }

    /* ------------------------ Opérations ------------------------ */

    /// Évalue une expression saisie. Succès : Ans + démarche mis à jour.
    pub fn submit_expression(&mut self, texte: &str) -> Resultat<String> {
        let r = self.calculer(texte);
        if let Err(e) = &r {
            warn!(%e, texte, "expression refusée");
        }
        r
    }

    fn calculer(&mut self, texte: &str) -> Resultat<String> {
        if self.menu == Menu::Equation {
            return Err(ErreurCalc::MenuIncompatible);
        }
        if texte.trim().is_empty() {
            return Err(ErreurCalc::syntaxe("Entrée vide"));
        }

        let bruts = tokenize(texte)?;
        let canon = normaliser(texte, self.angle, self.menu, self.ans)?;
        let domaine = match self.menu {
            Menu::Complexe => Domaine::Complexe,
            _ => Domaine::Reel,
        };
        let ev = evaluer_jetons(&canon, domaine, self.ans)?;

        // tout a réussi : on peut écrire
        self.ans = Some(ev.valeur);
        self.demarche = Demarche {
            jetons: format_tokens(&bruts),
            canonique: format_tokens(&canon),
            rpn: ev.rpn,
            arbre: ev.arbre,
        };
        Ok(self.formater(ev.valeur))
    }

    /// Racines d’un polynôme (champs texte, plus haut degré en tête).
    /// Sortie : "x1 = …, x2 = …" (ou "aucune solution").
    pub fn submit_polynomial<S: AsRef<str>>(&self, champs: &[S]) -> Resultat<String> {
        let r = lire_champs(champs)
            .and_then(|coeffs| solve_polynomial(&coeffs))
            .map(|racines| {
                lister(racines.iter().map(|z| format_racine(*z, self.numerique)))
            });
        if let Err(e) = &r {
            warn!(%e, "polynôme refusé");
        }
        r
    }

    /// Système A·x = b (lignes de champs texte + second membre).
    pub fn submit_linear_system<S: AsRef<str>>(
        &self,
        lignes: &[Vec<S>],
        second_membre: &[S],
    ) -> Resultat<String> {
        let r = self.resoudre_systeme(lignes, second_membre);
        if let Err(e) = &r {
            warn!(%e, "système refusé");
        }
        r
    }

    fn resoudre_systeme<S: AsRef<str>>(
        &self,
        lignes: &[Vec<S>],
        second_membre: &[S],
    ) -> Resultat<String> {
        let a = lignes
            .iter()
            .map(|l| lire_champs(l))
            .collect::<Resultat<Vec<_>>>()?;
        let b = lire_champs(second_membre)?;
        let x = solve_linear_system(&a, &b)?;
        Ok(lister(x.iter().map(|v| format_reel(*v, self.numerique))))
    }

    /// Rendu par défaut à la frontière : la valeur, ou "Error".
    pub fn afficher(resultat: &Resultat<String>) -> String {
        match resultat {
            Ok(s) => s.clone(),
            Err(_) => MARQUEUR_ERREUR.to_string(),
        }
    }

    /// Une valeur complexe garde l’affichage complexe même hors du menu Complexe.
    fn formater(&self, z: Complex64) -> String {
        let menu = if z.im != 0.0 { Menu::Complexe } else { self.menu };
        format(z, menu, self.complexe, self.numerique)
    }
}

/// Champ texte -> f64 fini.
fn lire_champ(champ: &str) -> Resultat<f64> {
    let t = champ.trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ErreurCalc::saisie(format!("« {t} » n’est pas un nombre"))),
    }
}

fn lire_champs<S: AsRef<str>>(champs: &[S]) -> Resultat<Vec<f64>> {
    champs.iter().map(|c| lire_champ(c.as_ref())).collect()
}

fn lister(valeurs: impl Iterator<Item = String>) -> String {
    let parties: Vec<String> = valeurs
        .enumerate()
        .map(|(i, v)| format!("x{} = {v}", i + 1))
        .collect();
    if parties.is_empty() {
        "aucune solution".to_string()
    } else {
        parties.join(", ")
    }
}
