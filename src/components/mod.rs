use yew::prelude::*;

/// An uncontrolled form input; its value is read back by field name on submit.
#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    /// Form field name, also used for the `id_<name>` element id
    pub name: AttrValue,
    /// Placeholder text
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub required: bool,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    html! {
        <input
            type={props.input_type.clone()}
            class="form-control"
            id={format!("id_{}", props.name)}
            name={props.name.clone()}
            placeholder={props.placeholder.clone()}
            aria-label={props.placeholder.clone()}
            required={props.required}
        />
    }
}

#[derive(Properties, PartialEq)]
pub struct FeedbackMessageProps {
    pub id: AttrValue,
    /// Message to show; `None` renders an empty container
    #[prop_or_default]
    pub message: Option<String>,
}

/// Card error container, rendered like the server template's `#card-errors`.
#[function_component(FeedbackMessage)]
pub fn feedback_message(props: &FeedbackMessageProps) -> Html {
    html! {
        <div id={props.id.clone()} class="mb-3 text-danger">
            if let Some(message) = &props.message {
                <span class="icon" role="alert">
                    <i class="fas fa-times"></i>
                </span>
                <span>{ message }</span>
            }
        </div>
    }
}
