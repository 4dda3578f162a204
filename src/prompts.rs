//! 対話入力（dialoguer）
//!
//! 入力後に共通の検証を走らせ、エラーのある項目だけを聞き直す。

use crate::error::Result;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use give_and_get_common::form::FieldKind;
use give_and_get_common::forms::donor::DONOR_TEMPLATE;
use give_and_get_common::forms::organization::{hour_option_for, HourOption, HOUR_OPTIONS, ORG_TEMPLATE};
use give_and_get_common::types::WEEKDAYS;
use give_and_get_common::validation::{humanize, parse_hours};
use give_and_get_common::{DonorForm, FieldGroup, Form, NeedField, OrganizationForm, Urgency};

const ORG_BASICS: [&str; 5] = ["EIN", "name", "address", "description", "image_address_url"];
const ORG_CONTACT: [&str; 3] = ["contact.phone", "contact.email", "contact.website"];
const ORG_CAPACITY: [&str; 5] = ["beds_available", "fees", "age_minimum", "age_maximum", "languages"];

pub fn fill_donor(form: &mut DonorForm) -> Result<()> {
    for spec in DONOR_TEMPLATE {
        prompt_field(form, spec.name)?;
    }
    revise(form, |form, field| prompt_field(form, field))
}

pub fn fill_organization(form: &mut OrganizationForm) -> Result<()> {
    println!("\n== Organization ==");
    prompt_org_type(form)?;
    for name in ORG_BASICS {
        prompt_field(form, name)?;
    }

    println!("\n== Contact ==");
    for name in ORG_CONTACT {
        prompt_field(form, name)?;
    }

    println!("\n== Hours ==");
    for day in WEEKDAYS {
        prompt_day_hours(form, day)?;
    }

    println!("\n== Amenities ==");
    prompt_amenities(form)?;
    for name in ORG_CAPACITY {
        prompt_field(form, name)?;
    }

    println!("\n== Needed items ==");
    prompt_needs(form)?;

    revise(form, |form, field| match field {
        "type" => prompt_org_type(form),
        _ => match field.strip_prefix("hours.") {
            Some(day) => prompt_day_hours(form, day),
            None => prompt_field(form, field),
        },
    })
}

/// 検証が通るまでエラー項目を聞き直す
fn revise<F: Form>(form: &mut F, mut fix: impl FnMut(&mut F, &str) -> Result<()>) -> Result<()> {
    while !form.validate() {
        println!("\n⚠ Please fix the following:");
        let failing: Vec<String> = form
            .errors()
            .iter()
            .map(|(field, message)| {
                println!("  - {}", message);
                field.to_string()
            })
            .collect();
        for field in failing {
            fix(form, &field)?;
        }
    }
    Ok(())
}

/// 1項目を入力（種別に合わせて入力方法を変える）
fn prompt_field<F: Form>(form: &mut F, name: &str) -> Result<()> {
    let state = form.state();
    let key = state.resolve(name)?;
    let kind = state.spec(&key).map(|spec| spec.kind()).unwrap_or(FieldKind::Text);
    let label = humanize(key.name);

    match kind {
        FieldKind::Bool => {
            let current = state.flag(name);
            let value = Confirm::new().with_prompt(label).default(current).interact()?;
            form.input(name, value.into())?;
        }
        _ if key.name.to_lowercase().contains("password") => {
            let value = Password::new()
                .with_prompt(label)
                .allow_empty_password(true)
                .interact()?;
            form.input(name, value.into())?;
        }
        _ => {
            let current = state.text(name);
            let value: String = Input::new()
                .with_prompt(label)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            form.input(name, value.into())?;
        }
    }
    Ok(())
}

fn prompt_org_type(form: &mut OrganizationForm) -> Result<()> {
    let state = form.state();
    let defaults = [state.flag("type.shelter"), state.flag("type.charity")];
    let chosen = MultiSelect::new()
        .with_prompt("Organization type (space to toggle)")
        .items(&["Shelter", "Charity"])
        .defaults(&defaults)
        .interact()?;
    form.input("type.shelter", chosen.contains(&0).into())?;
    form.input("type.charity", chosen.contains(&1).into())?;
    Ok(())
}

fn prompt_day_hours(form: &mut OrganizationForm, day: &str) -> Result<()> {
    let current = form.hours(day);
    let selected = hour_option_for(&current);
    let labels: Vec<&str> = HOUR_OPTIONS.iter().map(HourOption::label).collect();
    let default = HOUR_OPTIONS.iter().position(|o| *o == selected).unwrap_or(0);

    let choice = Select::new()
        .with_prompt(humanize(day))
        .items(&labels)
        .default(default)
        .interact()?;

    match HOUR_OPTIONS[choice] {
        HourOption::Preset { value, .. } => form.set_hours(day, value)?,
        HourOption::Custom => {
            let value: String = Input::new()
                .with_prompt(format!("{} hours (HHMM-HHMM or closed)", humanize(day)))
                .with_initial_text(current)
                .validate_with(|input: &String| parse_hours(input).map(|_| ()))
                .interact_text()?;
            form.set_hours(day, &value)?;
        }
    }
    Ok(())
}

fn prompt_amenities(form: &mut OrganizationForm) -> Result<()> {
    let flags: Vec<_> = ORG_TEMPLATE
        .iter()
        .filter(|spec| spec.group == FieldGroup::Amenities && spec.kind() == FieldKind::Bool)
        .collect();
    let labels: Vec<String> = flags.iter().map(|spec| humanize(spec.name)).collect();
    let defaults: Vec<bool> = flags
        .iter()
        .map(|spec| form.state().flag(&spec.key().to_string()))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Amenities and requirements (space to toggle)")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    for (index, spec) in flags.iter().enumerate() {
        form.input(&spec.key().to_string(), chosen.contains(&index).into())?;
    }
    Ok(())
}

fn prompt_needs(form: &mut OrganizationForm) -> Result<()> {
    let urgencies: Vec<&str> = Urgency::ALL.iter().map(Urgency::as_str).collect();

    loop {
        let prompt = if form.needs().is_empty() {
            "Add a needed item?"
        } else {
            "Add another needed item?"
        };
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            return Ok(());
        }

        let index = form.add_need();
        for (field, label, initial) in [
            (NeedField::Item, "Item", ""),
            (NeedField::Category, "Category", ""),
            (NeedField::Needed, "Quantity needed", "0"),
            (NeedField::Have, "Quantity on hand", "0"),
        ] {
            let value: String = Input::new()
                .with_prompt(label)
                .with_initial_text(initial)
                .allow_empty(true)
                .interact_text()?;
            form.update_need(index, field, &value)?;
        }

        let default = Urgency::ALL.iter().position(|u| *u == Urgency::default()).unwrap_or(0);
        let choice = Select::new()
            .with_prompt("Urgency")
            .items(&urgencies)
            .default(default)
            .interact()?;
        form.update_need(index, NeedField::Urgency, urgencies[choice])?;
    }
}
