/// One generation stage: consumes its input bundle and yields the generated content.
pub trait Layer<I, O> {
    fn generate(&self, input: I) -> O;
}
