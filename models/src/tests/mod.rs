mod element_builder;
